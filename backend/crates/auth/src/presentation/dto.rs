//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::{
    AccessTokenInfo, AuthTokens, LoginInput, RefreshTokenInfo, RegisterInput,
};
use crate::domain::entity::user::PublicUser;
use crate::domain::value_object::{
    avatar_url::AvatarUrl, display_name::DisplayName, email::Email, user_password::RawPassword,
};
use crate::error::AuthError;

// ============================================================================
// Register
// ============================================================================

/// Register request
///
/// Missing fields deserialize as empty strings so that the value objects
/// report them as "required" instead of a serde error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

impl TryFrom<RegisterRequest> for RegisterInput {
    type Error = AuthError;

    fn try_from(req: RegisterRequest) -> Result<Self, Self::Error> {
        let avatar = match req.avatar {
            Some(url) if !url.trim().is_empty() => Some(AvatarUrl::new(url)?),
            _ => None,
        };

        Ok(RegisterInput {
            name: DisplayName::new(&req.name)?,
            email: Email::new(req.email)?,
            password: RawPassword::new(req.password)?,
            avatar,
        })
    }
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginInput {
    type Error = AuthError;

    fn try_from(req: LoginRequest) -> Result<Self, Self::Error> {
        Ok(LoginInput {
            email: Email::new(req.email)?,
            password: RawPassword::for_login(req.password)?,
        })
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// Body of refresh, logout and verify-refresh-token
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

impl RefreshTokenRequest {
    pub fn into_token(self) -> Result<String, AuthError> {
        non_empty(self.refresh_token, "Refresh token is required")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyTokenRequest {
    pub token: String,
}

impl VerifyTokenRequest {
    pub fn into_token(self) -> Result<String, AuthError> {
        non_empty(self.token, "Token is required")
    }
}

fn non_empty(token: String, message: &str) -> Result<String, AuthError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Validation(message.to_string()));
    }
    Ok(token.to_string())
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<PublicUser> for UserResponse {
    fn from(user: PublicUser) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
        }
    }
}

/// Login / refresh response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<AuthTokens> for AuthResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            user: tokens.user.into(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Access token verification result; times are unix seconds
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenResponse {
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
    pub is_valid: bool,
}

impl From<AccessTokenInfo> for VerifyTokenResponse {
    fn from(info: AccessTokenInfo) -> Self {
        Self {
            user_id: info.user_id.to_string(),
            iat: info.issued_at.timestamp(),
            exp: info.expires_at.timestamp(),
            is_valid: info.is_valid,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenInfoResponse {
    pub user_id: String,
    pub token_id: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<RefreshTokenInfo> for RefreshTokenInfoResponse {
    fn from(info: RefreshTokenInfo) -> Self {
        Self {
            user_id: info.user_id.to_string(),
            token_id: info.token_id.to_string(),
            iat: info.issued_at.timestamp(),
            exp: info.expires_at.timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutAllResponse {
    pub revoked_sessions: u64,
}
