//! Environment-driven server configuration.
//!
//! | variable | default |
//! |---|---|
//! | `MENUTREE_HOST` | `127.0.0.1` |
//! | `MENUTREE_PORT` | `8080` |
//! | `MENUTREE_SEED` | `true` |
//! | `PING_MESSAGE` | `ping` |
//! | `CORS_ALLOW_ORIGIN` | unset (any origin) |

use axum::http::HeaderValue;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PING_MESSAGE: &str = "ping";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Load the sample hierarchy at startup.
    pub seed: bool,
    pub ping_message: String,
    /// Single allowed origin; `None` allows any origin.
    pub cors_allow_origin: Option<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            seed: true,
            ping_message: DEFAULT_PING_MESSAGE.to_string(),
            cors_allow_origin: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unset variables take their default;
    /// set but unparsable ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("MENUTREE_HOST") {
            if host.trim().is_empty() {
                return Err(ConfigError::invalid("MENUTREE_HOST", &host, "must not be empty"));
            }
            config.host = host;
        }
        if let Some(port) = lookup("MENUTREE_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("MENUTREE_PORT", &port, format!("{e}")))?;
        }
        if let Some(seed) = lookup("MENUTREE_SEED") {
            config.seed = parse_bool(&seed)
                .ok_or_else(|| ConfigError::invalid("MENUTREE_SEED", &seed, "expected a boolean"))?;
        }
        if let Some(message) = lookup("PING_MESSAGE") {
            config.ping_message = message;
        }
        if let Some(origin) = lookup("CORS_ALLOW_ORIGIN") {
            let value = origin.parse::<HeaderValue>().map_err(|_| {
                ConfigError::invalid("CORS_ALLOW_ORIGIN", &origin, "not a valid header value")
            })?;
            config.cors_allow_origin = Some(value);
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
