//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

use chrono::{DateTime, SubsecRound, Utc};

// Re-exports
pub use entity::{refresh_token::RefreshToken, user::User};
pub use repository::{RefreshTokenRepository, UserRepository};

/// Current time at storage precision (microseconds)
///
/// Every timestamp that takes part in the logout cutoff goes through here,
/// so values read back from Postgres compare equal to the ones written.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
