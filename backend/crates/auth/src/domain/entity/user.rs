//! User Entity

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::now;
use crate::domain::value_object::{
    avatar_url::AvatarUrl, display_name::DisplayName, email::Email, user_id::UserId,
    user_password::UserPassword,
};

/// User entity
///
/// Holds the password hash; never serialize it directly. Use
/// [`User::to_public`] for anything leaving the service.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: DisplayName,
    /// Unique, case-sensitive
    pub email: Email,
    pub password_hash: UserPassword,
    pub avatar: Option<AvatarUrl>,
    /// Access tokens issued at or before this instant are rejected
    pub last_logout_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What clients get to see of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    /// Create a new user
    pub fn new(
        name: DisplayName,
        email: Email,
        password_hash: UserPassword,
        avatar: Option<AvatarUrl>,
    ) -> Self {
        let now = now();

        Self {
            user_id: UserId::new(),
            name,
            email,
            password_hash,
            avatar,
            last_logout_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a logout event at `at`
    pub fn record_logout(&mut self, at: DateTime<Utc>) {
        self.last_logout_at = Some(at);
        self.updated_at = at;
    }

    /// Whether an access token issued at `issued_at` is cut off by the last
    /// logout.
    ///
    /// A token issued before the logout (`issued_at < last_logout_at`) is
    /// revoked. The cutoff is inclusive, so `issued_at == last_logout_at`
    /// is revoked too: a token minted in the same microsecond as the logout
    /// cannot be told apart from one minted just before it. Only tokens
    /// issued strictly after the logout stay valid.
    pub fn is_logged_out_since(&self, issued_at: DateTime<Utc>) -> bool {
        self.last_logout_at
            .is_some_and(|logout| issued_at <= logout)
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.user_id,
            name: self.name.to_string(),
            email: self.email.to_string(),
        }
    }
}
