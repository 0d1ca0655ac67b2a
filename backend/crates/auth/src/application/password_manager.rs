//! Password Manager
//!
//! Argon2id is deliberately slow, so hashing and verification run on the
//! blocking thread pool instead of stalling the async workers.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

#[derive(Clone)]
pub struct PasswordManager {
    config: Arc<AuthConfig>,
}

impl PasswordManager {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Hash a new password with the configured cost and pepper
    pub async fn hash(&self, raw: RawPassword) -> AuthResult<UserPassword> {
        let config = self.config.clone();
        let hashed = tokio::task::spawn_blocking(move || {
            UserPassword::from_raw(&raw, config.pepper(), config.password_cost)
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {}", e)))??;

        Ok(hashed)
    }

    /// `false` on mismatch or on an unreadable stored hash
    pub async fn verify(&self, raw: RawPassword, hash: UserPassword) -> AuthResult<bool> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || hash.verify(&raw, config.pepper()))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {}", e)))
    }
}
