//! Application Configuration
//!
//! Configuration for the Auth application layer, read from the environment.
//!
//! | Variable                    | Required | Example            |
//! |-----------------------------|----------|--------------------|
//! | `JWT_SECRET`                | yes      | long random string |
//! | `ACCESS_TOKEN_EXPIRES`      | yes      | `15m`              |
//! | `REFRESH_TOKEN_EXPIRES`     | yes      | `7d`               |
//! | `PASSWORD_PEPPER`           | no       |                    |
//! | `PASSWORD_HASH_MEMORY_KIB`  | no       | `19456`            |
//! | `PASSWORD_HASH_ITERATIONS`  | no       | `2`                |
//! | `PASSWORD_HASH_PARALLELISM` | no       | `1`                |

use std::fmt;

use chrono::TimeDelta;
use platform::duration::parse_duration;
use platform::password::PasswordCost;
use thiserror::Error;

/// Startup configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens
    pub jwt_secret: String,
    pub access_token_ttl: TimeDelta,
    pub refresh_token_ttl: TimeDelta,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    pub password_cost: PasswordCost,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl: TimeDelta::minutes(15),
            refresh_token_ttl: TimeDelta::days(7),
            password_pepper: None,
            password_cost: PasswordCost::default(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("password_cost", &self.password_cost)
            .finish()
    }
}

impl AuthConfig {
    /// Read from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let jwt_secret = required("JWT_SECRET")?;
        let access_token_ttl = ttl("ACCESS_TOKEN_EXPIRES", &required("ACCESS_TOKEN_EXPIRES")?)?;
        let refresh_token_ttl = ttl("REFRESH_TOKEN_EXPIRES", &required("REFRESH_TOKEN_EXPIRES")?)?;

        let password_pepper = lookup("PASSWORD_PEPPER")
            .filter(|p| !p.is_empty())
            .map(String::into_bytes);

        let defaults = PasswordCost::default();
        let cost_param = |var: &'static str, default: u32| match lookup(var) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            }),
            None => Ok(default),
        };
        let password_cost = PasswordCost {
            memory_kib: cost_param("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: cost_param("PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: cost_param("PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        };
        password_cost
            .validate()
            .map_err(|e| ConfigError::Invalid {
                var: "PASSWORD_HASH_*",
                reason: e.to_string(),
            })?;

        Ok(Self {
            jwt_secret,
            access_token_ttl,
            refresh_token_ttl,
            password_pepper,
            password_cost,
        })
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

/// Upper bound for token lifetimes (100 years)
const MAX_TTL_DAYS: i64 = 36_500;

fn ttl(var: &'static str, raw: &str) -> Result<TimeDelta, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid { var, reason };

    let duration = parse_duration(raw).map_err(|e| invalid(e.to_string()))?;
    let delta = TimeDelta::from_std(duration).map_err(|e| invalid(e.to_string()))?;
    if delta <= TimeDelta::zero() {
        return Err(invalid("must be greater than zero".to_string()));
    }
    if delta > TimeDelta::days(MAX_TTL_DAYS) {
        return Err(invalid(format!("must be at most {MAX_TTL_DAYS}d")));
    }
    Ok(delta)
}
