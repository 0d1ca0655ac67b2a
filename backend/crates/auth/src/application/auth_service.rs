//! Auth Service
//!
//! The session lifecycle: register, login, refresh (with rotation), logout,
//! logout everywhere, and token verification.

use std::sync::Arc;

use platform::client::ClientMetadata;

use crate::application::config::AuthConfig;
use crate::application::password_manager::PasswordManager;
use crate::application::token_manager::{
    AccessTokenInfo, RefreshTokenInfo, TokenManager, TokenPair,
};
use crate::domain::entity::user::{PublicUser, User};
use crate::domain::now;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    avatar_url::AvatarUrl, display_name::DisplayName, email::Email, user_id::UserId,
    user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Validated registration payload
#[derive(Debug)]
pub struct RegisterInput {
    pub name: DisplayName,
    pub email: Email,
    pub password: RawPassword,
    pub avatar: Option<AvatarUrl>,
}

/// Validated login payload
#[derive(Debug)]
pub struct LoginInput {
    pub email: Email,
    pub password: RawPassword,
}

/// Login / refresh result
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthTokens {
    fn new(user: &User, pair: TokenPair) -> Self {
        Self {
            user: user.to_public(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Auth use cases
#[trait_variant::make(AuthUseCases: Send)]
pub trait LocalAuthUseCases {
    /// Create an account. `EmailTaken` if the email is in use.
    async fn register(&self, input: RegisterInput) -> AuthResult<PublicUser>;

    /// `UserNotFound` for an unknown email, `InvalidCredentials` for a wrong password.
    async fn login(&self, input: LoginInput, client: ClientMetadata) -> AuthResult<AuthTokens>;

    /// Exchange a refresh token for a new pair, revoking the presented one.
    async fn refresh_tokens(
        &self,
        refresh_token: &str,
        client: ClientMetadata,
    ) -> AuthResult<AuthTokens>;

    /// Revoke one refresh token and cut off the owner's access tokens.
    /// Unknown tokens are ignored.
    async fn logout(&self, refresh_token: &str) -> AuthResult<()>;

    /// Revoke every refresh token of the user and cut off access tokens.
    /// Returns the number of refresh tokens revoked.
    async fn logout_all(&self, user_id: &UserId) -> AuthResult<u64>;

    async fn verify_token(&self, token: &str) -> AuthResult<AccessTokenInfo>;

    async fn verify_refresh_token(&self, token: &str) -> AuthResult<RefreshTokenInfo>;
}

/// Auth service
pub struct AuthService<U, S>
where
    U: UserRepository,
    S: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<S>,
    tokens: TokenManager<U, S>,
    passwords: PasswordManager,
}

impl<U, S> AuthService<U, S>
where
    U: UserRepository,
    S: RefreshTokenRepository,
{
    pub fn new(user_repo: Arc<U>, token_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            tokens: TokenManager::new(user_repo.clone(), token_repo.clone(), config.clone()),
            passwords: PasswordManager::new(config),
            user_repo,
            token_repo,
        }
    }

    pub fn token_manager(&self) -> &TokenManager<U, S> {
        &self.tokens
    }
}

impl<U, S> AuthUseCases for AuthService<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: RefreshTokenRepository + Send + Sync + 'static,
{
    async fn register(&self, input: RegisterInput) -> AuthResult<PublicUser> {
        if self.user_repo.exists_by_email(&input.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.passwords.hash(input.password).await?;
        let user = User::new(input.name, input.email, password_hash, input.avatar);

        // The unique index still catches a concurrent registration
        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.user_id, "User registered");

        Ok(user.to_public())
    }

    async fn login(&self, input: LoginInput, client: ClientMetadata) -> AuthResult<AuthTokens> {
        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let valid = self
            .passwords
            .verify(input.password, user.password_hash.clone())
            .await?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.tokens.generate_tokens(user.user_id, &client).await?;

        tracing::info!(
            user_id = %user.user_id,
            client_ip = ?client.ip,
            "User logged in"
        );

        Ok(AuthTokens::new(&user, pair))
    }

    async fn refresh_tokens(
        &self,
        refresh_token: &str,
        client: ClientMetadata,
    ) -> AuthResult<AuthTokens> {
        let info = self.tokens.verify_refresh_token(refresh_token).await?;

        let user = self
            .user_repo
            .find_by_id(&info.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Only one concurrent rotation of the same token may win
        if !self.token_repo.revoke(&info.token_id, now()).await? {
            tracing::warn!(
                token_id = %info.token_id,
                user_id = %info.user_id,
                "Refresh token rotated concurrently"
            );
            return Err(AuthError::RefreshTokenRevoked);
        }

        let pair = self.tokens.generate_tokens(user.user_id, &client).await?;

        tracing::info!(
            user_id = %user.user_id,
            rotated_token_id = %info.token_id,
            "Refresh token rotated"
        );

        Ok(AuthTokens::new(&user, pair))
    }

    async fn logout(&self, refresh_token: &str) -> AuthResult<()> {
        let Some(record) = self.token_repo.find_by_token(refresh_token).await? else {
            tracing::debug!("Logout with unknown refresh token ignored");
            return Ok(());
        };

        let at = now();
        self.token_repo.revoke(&record.token_id, at).await?;
        self.user_repo.set_last_logout(&record.user_id, at).await?;

        tracing::info!(
            user_id = %record.user_id,
            token_id = %record.token_id,
            "User logged out"
        );

        Ok(())
    }

    async fn logout_all(&self, user_id: &UserId) -> AuthResult<u64> {
        let at = now();
        if !self.user_repo.set_last_logout(user_id, at).await? {
            return Err(AuthError::UserNotFound);
        }

        let revoked = self.token_repo.revoke_all_for_user(user_id, at).await?;

        tracing::info!(user_id = %user_id, revoked, "User logged out everywhere");

        Ok(revoked)
    }

    async fn verify_token(&self, token: &str) -> AuthResult<AccessTokenInfo> {
        self.tokens.verify_access_token(token).await
    }

    async fn verify_refresh_token(&self, token: &str) -> AuthResult<RefreshTokenInfo> {
        self.tokens.verify_refresh_token(token).await
    }
}
