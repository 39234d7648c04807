//! Bookstore API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upper bound of the report window (about a century).
const MAX_REPORT_WINDOW_HOURS: u64 = 876_000;

/// Bookstore API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listen address (default: 0.0.0.0)
    pub bind_addr: String,

    /// HTTP port
    pub port: u16,

    /// Timeout of one request, in seconds
    pub request_timeout_secs: u64,

    /// Trailing window of the default sales report, in hours
    pub report_window_hours: u64,

    /// Period of the background report, in seconds
    pub report_interval_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "0.0.0.0".to_string(),
            port: 8085,
            request_timeout_secs: 5,
            report_window_hours: 24,
            report_interval_secs: 86_400, // 1 day
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key lookup (the process environment
    /// in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            bind_addr: lookup("BOOKSTORE_BIND_ADDR").unwrap_or(defaults.bind_addr),

            port: parse_or(&lookup, "BOOKSTORE_PORT", defaults.port)?,

            request_timeout_secs: parse_or(
                &lookup,
                "BOOKSTORE_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,

            report_window_hours: parse_or(
                &lookup,
                "BOOKSTORE_REPORT_WINDOW_HOURS",
                defaults.report_window_hours,
            )?,

            report_interval_secs: parse_or(
                &lookup,
                "BOOKSTORE_REPORT_INTERVAL_SECS",
                defaults.report_interval_secs,
            )?,
        };

        require_positive("BOOKSTORE_REQUEST_TIMEOUT_SECS", config.request_timeout_secs)?;
        require_positive("BOOKSTORE_REPORT_WINDOW_HOURS", config.report_window_hours)?;
        require_positive("BOOKSTORE_REPORT_INTERVAL_SECS", config.report_interval_secs)?;
        if config.report_window_hours > MAX_REPORT_WINDOW_HOURS {
            return Err(ConfigError::InvalidValue(
                "BOOKSTORE_REPORT_WINDOW_HOURS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Socket address to bind the HTTP listener to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BOOKSTORE_BIND_ADDR".to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn report_window(&self) -> chrono::Duration {
        let hours = self.report_window_hours.min(MAX_REPORT_WINDOW_HOURS);
        chrono::Duration::hours(hours as i64)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

fn require_positive(key: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue(key.to_string()));
    }
    Ok(())
}

/// Configuration error types.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
