//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Auth service, token and password managers, config
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Registration and login with email + password
//! - Short-lived JWT access tokens, opaque refresh tokens rotated on use
//! - Logout of one session or all sessions of a user
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional server-side pepper
//! - Refresh tokens stored with client IP and User-Agent
//! - Access tokens issued at or before the user's last logout are rejected
//! - Concurrent rotations of the same refresh token: exactly one wins

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use application::{AuthService, AuthUseCases};
pub use error::{AuthError, AuthResult};
pub use infra::{memory::MemoryAuthRepository, postgres::PgAuthRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
