//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::value_object::{
    email::Email, refresh_token_id::RefreshTokenId, user_id::UserId,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user. A duplicate email fails with `AuthError::EmailTaken`.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by exact email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Set the logout cutoff. Returns `false` if the user does not exist.
    async fn set_last_logout(&self, user_id: &UserId, at: DateTime<Utc>) -> AuthResult<bool>;
}

/// Refresh token repository trait
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Persist a newly issued token
    async fn create(&self, token: &RefreshToken) -> AuthResult<()>;

    /// Find a token record by its opaque value, revoked or not
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshToken>>;

    /// Revoke one record if it is not revoked yet.
    ///
    /// Returns `true` only for the call that actually performed the
    /// revocation; concurrent callers on the same record see `false`.
    async fn revoke(&self, token_id: &RefreshTokenId, at: DateTime<Utc>) -> AuthResult<bool>;

    /// Revoke every non-revoked record of a user. Returns the count.
    async fn revoke_all_for_user(&self, user_id: &UserId, at: DateTime<Utc>) -> AuthResult<u64>;

    /// Delete records whose expiry lies before `now`. Returns the count.
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}
