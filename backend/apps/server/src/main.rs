//! Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod chat;
mod config;

use std::net::SocketAddr;
use std::time::Instant;

use auth::domain::{now, repository::RefreshTokenRepository};
use auth::{AuthConfig, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
    routing::get,
};
use kernel::response::ApiResponse;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::chat::chat_router;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = ServerConfig::from_env()?;
    let auth_config = AuthConfig::from_env()?;

    tracing::info!(
        port = server_config.port,
        access_token_ttl = %auth_config.access_token_ttl,
        refresh_token_ttl = %auth_config.refresh_token_ttl,
        "Configuration loaded"
    );

    // Database connection
    let repo =
        PgAuthRepository::connect(&server_config.database_url, server_config.max_connections)
            .await?;
    repo.migrate().await?;

    // Startup cleanup: errors here should not prevent server startup
    match repo.cleanup_expired(now()).await {
        Ok(deleted) => {
            tracing::info!(tokens_deleted = deleted, "Refresh token cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Refresh token cleanup failed, continuing anyway");
        }
    }

    let sweeper = spawn_refresh_token_sweep(repo.clone(), server_config.sweep_interval);

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = server_config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let started = Instant::now();
    let app = Router::new()
        .route("/health", get(move || health(started)))
        .nest("/api/auth", auth_router(repo.clone(), auth_config))
        .nest("/api/chat", chat_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.abort();
    repo.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Periodically delete refresh tokens past their expiry
fn spawn_refresh_token_sweep(
    repo: PgAuthRepository,
    every: std::time::Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately; startup already swept
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = repo.cleanup_expired(now()).await {
                tracing::warn!(error = %e, "Refresh token sweep failed");
            }
        }
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthStatus {
    uptime_secs: u64,
}

/// GET /health
async fn health(started: Instant) -> ApiResponse<HealthStatus> {
    ApiResponse::ok(
        "Server is healthy",
        HealthStatus {
            uptime_secs: started.elapsed().as_secs(),
        },
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
