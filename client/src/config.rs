//! Configuration for the todo client.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default API root, where the companion server listens
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// REST API configuration
    pub api: ApiConfig,
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset
    pub log_level: LogLevel,
    /// Seconds to wait for in-flight requests on exit
    pub shutdown_timeout: u64,
}

/// REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL; requests go to `{base_url}/todos`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
}

/// Wrapper so the default log level lives next to the type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl ApiConfig {
    /// Per-request timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: 30,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            log_level: LogLevel::default(),
            shutdown_timeout: 5,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | variable | default |
    /// |---|---|
    /// | `TODO_API_URL` | `http://localhost:3001` |
    /// | `TODO_API_TIMEOUT_SECS` | `30` |
    /// | `TODO_LOG_LEVEL` | `info` |
    /// | `TODO_SHUTDOWN_TIMEOUT_SECS` | `5` |
    ///
    /// Unparseable numbers fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an explicit variable source
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            api: ApiConfig {
                base_url: lookup("TODO_API_URL")
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or(defaults.api.base_url),
                request_timeout: lookup("TODO_API_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.api.request_timeout),
            },
            log_level: lookup("TODO_LOG_LEVEL")
                .map(LogLevel)
                .unwrap_or(defaults.log_level),
            shutdown_timeout: lookup("TODO_SHUTDOWN_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.shutdown_timeout),
        }
    }

    /// Shutdown timeout as a `Duration`
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_level, LogLevel("info".into()));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("TODO_API_URL", "https://todos.example.com"),
            ("TODO_API_TIMEOUT_SECS", "3"),
            ("TODO_LOG_LEVEL", "debug"),
            ("TODO_SHUTDOWN_TIMEOUT_SECS", "1"),
        ]);
        assert_eq!(config.api.base_url, "https://todos.example.com");
        assert_eq!(config.api.request_timeout, 3);
        assert_eq!(config.log_level.0, "debug");
        assert_eq!(config.shutdown_timeout, 1);
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = config_from(&[
            ("TODO_API_URL", "  "),
            ("TODO_API_TIMEOUT_SECS", "soon"),
        ]);
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.request_timeout, 30);
    }
}
