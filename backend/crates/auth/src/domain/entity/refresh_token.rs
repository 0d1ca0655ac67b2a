//! Refresh Token Entity
//!
//! One persisted record per issued refresh token. Records are revoked in
//! place (logout, logout-all, rotation, or expiry noticed on read) and only
//! physically removed by the expiry sweep.

use chrono::{DateTime, TimeDelta, Utc};
use platform::client::ClientMetadata;

use crate::domain::value_object::{refresh_token_id::RefreshTokenId, user_id::UserId};

/// Refresh token entity
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub token_id: RefreshTokenId,
    /// Opaque bearer value handed to the client (unique)
    pub token: String,
    pub user_id: UserId,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle position of a record at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Revoked,
    Expired,
}

impl RefreshToken {
    /// Issue a new token for `user_id`
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    /// `None` if `now + ttl` is out of the representable range.
    pub fn issue(
        user_id: UserId,
        token: String,
        client: &ClientMetadata,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;

        Some(Self {
            token_id: RefreshTokenId::new(),
            token,
            user_id,
            client_ip: client.ip_string(),
            user_agent: Some(client.user_agent.clone()),
            expires_at,
            revoked_at: None,
            created_at: now,
        })
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Expired strictly after `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Revocation wins over expiry
    pub fn state_at(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.is_revoked() {
            RefreshTokenState::Revoked
        } else if self.is_expired_at(now) {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }

    /// Revoke in memory. Keeps the first revocation time.
    pub fn revoke(&mut self, at: DateTime<Utc>) {
        self.revoked_at.get_or_insert(at);
    }
}
