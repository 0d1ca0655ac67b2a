//! In-memory repository
//!
//! Same contract as [`super::postgres::PgAuthRepository`], backed by a
//! `tokio::sync::RwLock`. Used by the test suite and handy for local
//! experiments without a database.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, refresh_token_id::RefreshTokenId, user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    refresh_tokens: HashMap<RefreshTokenId, RefreshToken>,
}

#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All refresh token records of a user, revoked or not
    pub async fn refresh_tokens_of(&self, user_id: &UserId) -> Vec<RefreshToken> {
        self.tables
            .read()
            .await
            .refresh_tokens
            .values()
            .filter(|t| &t.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Overwrite a stored refresh token (e.g. to backdate its expiry)
    pub async fn put_refresh_token(&self, token: RefreshToken) {
        self.tables
            .write()
            .await
            .refresh_tokens
            .insert(token.token_id, token);
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        tables.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.tables.read().await.users.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .any(|u| &u.email == email))
    }

    async fn set_last_logout(&self, user_id: &UserId, at: DateTime<Utc>) -> AuthResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(user_id) {
            Some(user) => {
                user.record_logout(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl RefreshTokenRepository for MemoryAuthRepository {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        if tables.refresh_tokens.values().any(|t| t.token == token.token) {
            return Err(AuthError::Internal("Duplicate refresh token".to_string()));
        }
        tables.refresh_tokens.insert(token.token_id, token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshToken>> {
        Ok(self
            .tables
            .read()
            .await
            .refresh_tokens
            .values()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn revoke(&self, token_id: &RefreshTokenId, at: DateTime<Utc>) -> AuthResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.refresh_tokens.get_mut(token_id) {
            Some(token) if !token.is_revoked() => {
                token.revoke(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: &UserId, at: DateTime<Utc>) -> AuthResult<u64> {
        let mut tables = self.tables.write().await;
        let mut count = 0;
        for token in tables
            .refresh_tokens
            .values_mut()
            .filter(|t| &t.user_id == user_id && !t.is_revoked())
        {
            token.revoke(at);
            count += 1;
        }
        Ok(count)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.refresh_tokens.len();
        tables.refresh_tokens.retain(|_, t| t.expires_at >= now);
        Ok((before - tables.refresh_tokens.len()) as u64)
    }
}
