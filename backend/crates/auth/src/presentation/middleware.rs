//! Auth Middleware
//!
//! Bearer access token check for protected routes.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::AuthUseCases;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Owner of a verified access token, stored in request extensions
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Reject the request unless it carries a valid, non-revoked access token
pub async fn require_access_token<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;

    let info = state.service().verify_token(&token).await?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: info.user_id,
    });

    Ok(next.run(req).await)
}

/// `Authorization: Bearer <token>`, scheme matched case-insensitively
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
