//! Process configuration read from the environment at startup.
//!
//! | Env Var                   | Default                 |
//! |---------------------------|-------------------------|
//! | `HOST`                    | `0.0.0.0`               |
//! | `PORT`                    | `3000`                  |
//! | `CORS_ORIGINS`            | `http://localhost:5173` |
//! | `REQUEST_TIMEOUT_SECS`    | `30`                    |
//! | `SHUTDOWN_TIMEOUT_SECS`   | `30`                    |
//! | `JWT_SECRET`              | required                |
//! | `JWT_ACCESS_EXPIRY_MINS`  | `15`                    |
//! | `JWT_REFRESH_EXPIRY_DAYS` | `7`                     |

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Everything the API server needs besides the database URL.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Requests running longer than this answer 503 `TRANSIENT`.
    pub request_timeout_secs: u64,
    /// Upper bound on closing the pool after the listener stops.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Unset keys take their
    /// default; set but unparsable keys are an error rather than a fallback.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "PORT", 3000)?,
            cors_origins,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30)?,
            jwt: JwtConfig {
                secret,
                access_token_expiry_mins: parse_or(
                    &lookup,
                    "JWT_ACCESS_EXPIRY_MINS",
                    DEFAULT_ACCESS_EXPIRY_MINS,
                )?,
                refresh_token_expiry_days: parse_or(
                    &lookup,
                    "JWT_REFRESH_EXPIRY_DAYS",
                    DEFAULT_REFRESH_EXPIRY_DAYS,
                )?,
            },
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = IpAddr::from_str(&self.host).map_err(|_| ConfigError::Invalid {
            key: "HOST",
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
