//! Server configuration
//!
//! Everything outside the auth core: storage, listener, CORS, and the
//! refresh token sweep.

use std::time::Duration;

use auth::ConfigError;
use platform::duration::parse_duration;

pub const DEFAULT_PORT: u16 = 31113;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub sweep_interval: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = optional("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "DATABASE_MAX_CONNECTIONS",
                        reason: format!("expected a positive integer, got {raw:?}"),
                    });
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let port = match optional("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                reason: format!("expected 0-65535, got {raw:?}"),
            })?,
            None => DEFAULT_PORT,
        };

        let frontend_origins = optional("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let sweep_interval = match optional("REFRESH_TOKEN_SWEEP_INTERVAL") {
            Some(raw) => {
                let interval = parse_duration(&raw).map_err(|e| ConfigError::Invalid {
                    var: "REFRESH_TOKEN_SWEEP_INTERVAL",
                    reason: e.to_string(),
                })?;
                if interval.is_zero() {
                    return Err(ConfigError::Invalid {
                        var: "REFRESH_TOKEN_SWEEP_INTERVAL",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                interval
            }
            None => DEFAULT_SWEEP_INTERVAL,
        };

        Ok(Self {
            database_url,
            max_connections,
            port,
            frontend_origins,
            sweep_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        ServerConfig::from_lookup(|key| map.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/app")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.sweep_interval, DEFAULT_SWEEP_INTERVAL);
        assert_eq!(config.frontend_origins.len(), 2);
    }

    #[test]
    fn test_database_url_required() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("PORT", "8080"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
            ("FRONTEND_ORIGINS", "https://a.example, https://b.example,"),
            ("REFRESH_TOKEN_SWEEP_INTERVAL", "5m"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 20);
        assert_eq!(
            config.frontend_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.sweep_interval, Duration::from_secs(300));
    }

    #[test]
    fn test_invalid_values() {
        let base = ("DATABASE_URL", "postgres://localhost/app");
        assert!(matches!(
            config(&[base, ("PORT", "70000")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert!(matches!(
            config(&[base, ("DATABASE_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::Invalid { var: "DATABASE_MAX_CONNECTIONS", .. })
        ));
        assert!(matches!(
            config(&[base, ("REFRESH_TOKEN_SWEEP_INTERVAL", "soon")]),
            Err(ConfigError::Invalid { var: "REFRESH_TOKEN_SWEEP_INTERVAL", .. })
        ));
    }
}
