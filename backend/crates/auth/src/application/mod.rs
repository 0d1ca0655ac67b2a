//! Application Layer
//!
//! Use cases and application services.

pub mod auth_service;
pub mod config;
pub mod password_manager;
pub mod token_manager;

// Re-exports
pub use auth_service::{
    AuthService, AuthTokens, AuthUseCases, LocalAuthUseCases, LoginInput, RegisterInput,
};
pub use config::{AuthConfig, ConfigError};
pub use password_manager::PasswordManager;
pub use token_manager::{AccessTokenInfo, RefreshTokenInfo, TokenManager, TokenPair};
