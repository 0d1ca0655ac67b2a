//! Access Token Claims
//!
//! Payload of the signed access token. `iat`/`exp` are the standard
//! second-resolution claims checked by the JWT library; `iat_us`/`exp_us`
//! repeat both instants in microseconds. `iat_us` is compared against the
//! owner's last logout and `exp_us` is the authoritative expiry. `exp` is
//! rounded up so the library never rejects a token before `exp_us`.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::user_id::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iat_us: i64,
    pub exp_us: i64,
}

impl AccessClaims {
    /// `issued_at` is expected to be truncated to microseconds already.
    ///
    /// `None` if `issued_at + ttl` is out of the representable range.
    pub fn new(user_id: UserId, issued_at: DateTime<Utc>, ttl: TimeDelta) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(ttl)?.trunc_subsecs(6);
        let round_up = i64::from(expires_at.timestamp_subsec_nanos() > 0);

        Some(Self {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp() + round_up,
            iat_us: issued_at.timestamp_micros(),
            exp_us: expires_at.timestamp_micros(),
        })
    }

    /// `None` if `sub` is not a UUID
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse_str(&self.sub).ok()
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.iat_us)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.exp_us)
    }
}
