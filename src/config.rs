//! Server configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Read once at process start. Only the upstream credential is required;
//! everything else falls back to a default that works for local development.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GENERATION_API_BASE_URL: &str = "https://api.daydream.live/v1";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_UPSTREAM_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub api_key: String,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    pub timeouts: UpstreamTimeouts,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `GENERATION_API_KEY`
    ///
    /// Optional:
    /// - `GENERATION_API_BASE_URL`: default `https://api.daydream.live/v1`
    /// - `PORT`: default 3000
    /// - `POLL_INTERVAL_MS`: default 1000
    /// - `POLL_MAX_ATTEMPTS`: default 30
    /// - `UPSTREAM_REQUEST_TIMEOUT_SECS`: default 60
    /// - `UPSTREAM_CONNECT_TIMEOUT_SECS`: default 10
    /// - `STATIC_DIR`: browser pages served as the router fallback
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is missing or a numeric value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GENERATION_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("GENERATION_API_KEY"))?;

        let api_base_url = std::env::var("GENERATION_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GENERATION_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT)?,
            api_base_url,
            api_key,
            poll_interval: Duration::from_millis(env_parse("POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?),
            poll_max_attempts: env_parse("POLL_MAX_ATTEMPTS", DEFAULT_POLL_MAX_ATTEMPTS)?,
            timeouts: UpstreamTimeouts {
                request_secs: env_parse("UPSTREAM_REQUEST_TIMEOUT_SECS", DEFAULT_UPSTREAM_REQUEST_TIMEOUT_SECS)?,
                connect_secs: env_parse("UPSTREAM_CONNECT_TIMEOUT_SECS", DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS)?,
            },
            static_dir: std::env::var("STATIC_DIR").ok().map(PathBuf::from),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
