//! HTTP Handlers

use axum::Extension;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::request::Parts;
use kernel::response::ApiResponse;
use platform::client::{ClientMetadata, extract_client_metadata};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{AuthService, AuthUseCases, LoginInput, RegisterInput};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthResponse, LoginRequest, LogoutAllResponse, RefreshTokenInfoResponse, RefreshTokenRequest,
    RegisterRequest, UserResponse, VerifyTokenRequest, VerifyTokenResponse,
};
use crate::presentation::middleware::AuthenticatedUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }

    pub(crate) fn service(&self) -> AuthService<R, R> {
        AuthService::new(self.repo.clone(), self.repo.clone(), self.config.clone())
    }
}

/// Caller IP and User-Agent
///
/// Uses `ConnectInfo` when the server was started with it, and falls back
/// to the forwarding headers alone otherwise.
pub struct Client(pub ClientMetadata);

impl<S> FromRequestParts<S> for Client
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Ok(Client(extract_client_metadata(&parts.headers, direct_ip)))
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let input = RegisterInput::try_from(req)?;

    let user = state.service().register(input).await?;

    Ok(ApiResponse::created("User registered successfully", user.into()))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Client(client): Client,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<AuthResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let input = LoginInput::try_from(req)?;

    let tokens = state.service().login(input, client).await?;

    Ok(ApiResponse::ok("Login successful", tokens.into()))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    Client(client): Client,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<AuthResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let token = req.into_token()?;

    let tokens = state.service().refresh_tokens(&token, client).await?;

    Ok(ApiResponse::ok("Token refreshed successfully", tokens.into()))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<()>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let token = req.into_token()?;

    state.service().logout(&token).await?;

    Ok(ApiResponse::empty("Logout successful"))
}

/// POST /api/auth/logout-all
///
/// Behind [`super::middleware::require_access_token`].
pub async fn logout_all<R>(
    State(state): State<AuthAppState<R>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AuthResult<ApiResponse<LogoutAllResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let revoked_sessions = state.service().logout_all(&user.user_id).await?;

    Ok(ApiResponse::ok(
        "Logged out from all sessions",
        LogoutAllResponse { revoked_sessions },
    ))
}

// ============================================================================
// Verification
// ============================================================================

/// POST /api/auth/verify-token
pub async fn verify_token<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<VerifyTokenRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<VerifyTokenResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let token = req.into_token()?;

    let info = state.service().verify_token(&token).await?;

    Ok(ApiResponse::ok("Token is valid", info.into()))
}

/// POST /api/auth/verify-refresh-token
pub async fn verify_refresh_token<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<RefreshTokenInfoResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let token = req.into_token()?;

    let info = state.service().verify_refresh_token(&token).await?;

    Ok(ApiResponse::ok("Refresh token is valid", info.into()))
}

/// GET /api/auth/health
pub async fn health() -> ApiResponse<()> {
    ApiResponse::empty("Auth service healthy")
}
