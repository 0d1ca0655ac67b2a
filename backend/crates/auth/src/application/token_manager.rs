//! Token Manager
//!
//! Issues and verifies the two credentials of a session:
//!
//! - **Access token**: HS256 JWT, short-lived, never stored. Revoked en masse
//!   by the owner's `last_logout_at`.
//! - **Refresh token**: opaque random string, stored with its expiry and
//!   revocation time, rotated on every use.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use platform::client::ClientMetadata;

use crate::application::config::AuthConfig;
use crate::domain::entity::refresh_token::{RefreshToken, RefreshTokenState};
use crate::domain::now;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    access_claims::AccessClaims, refresh_token_id::RefreshTokenId, user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

/// Freshly minted access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful access token verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenInfo {
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_valid: bool,
}

/// Result of a successful refresh token verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenInfo {
    pub user_id: UserId,
    pub token_id: RefreshTokenId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenManager<U, S>
where
    U: UserRepository,
    S: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<S>,
    config: Arc<AuthConfig>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<U, S> TokenManager<U, S>
where
    U: UserRepository,
    S: RefreshTokenRepository,
{
    pub fn new(user_repo: Arc<U>, token_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        let secret = config.jwt_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            user_repo,
            token_repo,
            config,
        }
    }

    // ========================================================================
    // Issuing
    // ========================================================================

    pub fn generate_access_token(&self, user_id: UserId) -> AuthResult<String> {
        self.generate_access_token_at(user_id, now())
    }

    /// Sign an access token as if issued at `issued_at`
    pub fn generate_access_token_at(
        &self,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = AccessClaims::new(user_id, issued_at, self.config.access_token_ttl)
            .ok_or_else(|| AuthError::Internal("Access token expiry out of range".to_string()))?;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign access token: {}", e)))
    }

    /// Create and persist a refresh token record
    pub async fn generate_refresh_token(
        &self,
        user_id: UserId,
        client: &ClientMetadata,
    ) -> AuthResult<RefreshToken> {
        let record = RefreshToken::issue(
            user_id,
            platform::crypto::random_token(),
            client,
            now(),
            self.config.refresh_token_ttl,
        )
        .ok_or_else(|| AuthError::Internal("Refresh token expiry out of range".to_string()))?;

        self.token_repo.create(&record).await?;

        tracing::debug!(
            user_id = %user_id,
            token_id = %record.token_id,
            expires_at = %record.expires_at,
            "Refresh token issued"
        );

        Ok(record)
    }

    pub async fn generate_tokens(
        &self,
        user_id: UserId,
        client: &ClientMetadata,
    ) -> AuthResult<TokenPair> {
        let access_token = self.generate_access_token(user_id)?;
        let refresh = self.generate_refresh_token(user_id, client).await?;

        Ok(TokenPair {
            access_token,
            refresh_token: refresh.token,
        })
    }

    // ========================================================================
    // Verification
    // ========================================================================

    /// Signature and expiry first, then the owner's logout cutoff.
    ///
    /// The JWT `exp` is whole seconds; `exp_us` is checked here so a token
    /// lives exactly the configured TTL.
    pub async fn verify_access_token(&self, token: &str) -> AuthResult<AccessTokenInfo> {
        let claims = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)?.claims;

        let (Some(user_id), Some(issued_at), Some(expires_at)) =
            (claims.user_id(), claims.issued_at(), claims.expires_at())
        else {
            return Err(AuthError::AccessTokenInvalid);
        };

        if now() > expires_at {
            return Err(AuthError::AccessTokenExpired);
        }

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::AccessTokenInvalid)?;

        if user.is_logged_out_since(issued_at) {
            tracing::debug!(user_id = %user_id, "Access token predates logout");
            return Err(AuthError::AccessTokenRevoked);
        }

        Ok(AccessTokenInfo {
            user_id,
            issued_at,
            expires_at,
            is_valid: true,
        })
    }

    /// Look up and classify a refresh token.
    ///
    /// Side effect: a record found past its expiry is revoked on the spot.
    pub async fn verify_refresh_token(&self, token: &str) -> AuthResult<RefreshTokenInfo> {
        let record = self
            .token_repo
            .find_by_token(token)
            .await?
            .ok_or(AuthError::RefreshTokenInvalid)?;

        let now = now();
        match record.state_at(now) {
            RefreshTokenState::Active => Ok(RefreshTokenInfo {
                user_id: record.user_id,
                token_id: record.token_id,
                issued_at: record.created_at,
                expires_at: record.expires_at,
            }),
            RefreshTokenState::Revoked => Err(AuthError::RefreshTokenRevoked),
            RefreshTokenState::Expired => {
                self.token_repo.revoke(&record.token_id, now).await?;
                tracing::info!(
                    token_id = %record.token_id,
                    user_id = %record.user_id,
                    "Expired refresh token revoked on use"
                );
                Err(AuthError::RefreshTokenExpired)
            }
        }
    }
}
