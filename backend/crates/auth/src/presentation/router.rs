//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_access_token;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, config);

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route(
            "/logout-all",
            post(handlers::logout_all::<R>).route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_access_token::<R>,
            )),
        )
        .route("/verify-token", post(handlers::verify_token::<R>))
        .route(
            "/verify-refresh-token",
            post(handlers::verify_refresh_token::<R>),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
}
