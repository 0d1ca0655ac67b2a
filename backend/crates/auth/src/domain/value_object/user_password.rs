//! User Password Value Object
//!
//! Domain wrapper over `platform::password`. Validation failures become
//! client-facing `AppError`s; hashing itself is delegated.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::PasswordCost;
//!
//! let raw = RawPassword::new("secret".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None, PasswordCost::minimal()).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashedPassword, PasswordCost, PasswordHashError, PasswordPolicyError,
};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password chosen at registration
    ///
    /// NFKC normalized, 3 to 200 characters, no control characters.
    pub fn new(raw: String) -> AppResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(policy_error)
    }

    /// Password presented at login; only required to be non-empty
    pub fn for_login(raw: String) -> AppResult<Self> {
        ClearTextPassword::for_verification(raw)
            .map(Self)
            .map_err(policy_error)
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

fn policy_error(e: PasswordPolicyError) -> AppError {
    match e {
        PasswordPolicyError::TooShort { min, .. } => {
            AppError::bad_request(format!("Password must be at least {} characters", min))
        }
        PasswordPolicyError::TooLong { max, .. } => {
            AppError::bad_request(format!("Password must be at most {} characters", max))
        }
        PasswordPolicyError::EmptyOrWhitespace => AppError::bad_request("Password is required"),
        PasswordPolicyError::InvalidCharacter => {
            AppError::bad_request("Password contains invalid characters")
        }
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Argon2id PHC string. Safe to store and log.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>, cost: PasswordCost) -> AppResult<Self> {
        raw.inner()
            .hash(pepper, cost)
            .map(Self)
            .map_err(|e| match e {
                PasswordHashError::InvalidParams(msg) => {
                    AppError::internal(format!("Password hashing misconfigured: {}", msg))
                }
                other => AppError::internal(other.to_string()),
            })
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|e| AppError::internal("Invalid password hash in database").with_source(e))
    }

    /// Get PHC string for database storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time verification; `pepper` must match the one used at hashing.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
