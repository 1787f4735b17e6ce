//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_DATA_DIR` - Directory for persisted state (default: .creator-market)
//! - `STOREFRONT_AUTH_LATENCY_MS` - Simulated login/signup latency (default: 1000)
//! - `STOREFRONT_CHECKOUT_LATENCY_MS` - Simulated payment latency (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".creator-market";
const DEFAULT_AUTH_LATENCY_MS: &str = "1000";
const DEFAULT_CHECKOUT_LATENCY_MS: &str = "2000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory holding one JSON file per persisted store
    pub data_dir: PathBuf,
    /// Delay before the mock auth backend answers
    pub auth_latency: Duration,
    /// Delay before a simulated payment completes
    pub checkout_latency: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            auth_latency: Duration::from_millis(1000),
            checkout_latency: Duration::from_millis(2000),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a latency is not a whole number of
    /// milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a latency is not a whole number of
    /// milliseconds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = PathBuf::from(get_or("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));
        let auth_latency = parse_millis(
            "STOREFRONT_AUTH_LATENCY_MS",
            &get_or("STOREFRONT_AUTH_LATENCY_MS", DEFAULT_AUTH_LATENCY_MS),
        )?;
        let checkout_latency = parse_millis(
            "STOREFRONT_CHECKOUT_LATENCY_MS",
            &get_or("STOREFRONT_CHECKOUT_LATENCY_MS", DEFAULT_CHECKOUT_LATENCY_MS),
        )?;

        Ok(Self {
            data_dir,
            auth_latency,
            checkout_latency,
            sentry_dsn: non_empty("SENTRY_DSN"),
            sentry_environment: non_empty("SENTRY_ENVIRONMENT"),
        })
    }
}

/// Parse a millisecond count into a `Duration`.
fn parse_millis(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.data_dir, PathBuf::from(".creator-market"));
        assert_eq!(config.auth_latency, Duration::from_secs(1));
        assert_eq!(config.checkout_latency, Duration::from_secs(2));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STOREFRONT_DATA_DIR", "/tmp/cm"),
            ("STOREFRONT_AUTH_LATENCY_MS", "0"),
            ("STOREFRONT_CHECKOUT_LATENCY_MS", " 250 "),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/cm"));
        assert_eq!(config.auth_latency, Duration::ZERO);
        assert_eq!(config.checkout_latency, Duration::from_millis(250));
        assert_eq!(config.sentry_dsn.as_deref(), Some("https://key@sentry.example.com/1"));
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_blank_sentry_dsn_is_none() {
        let config = config_from(&[("SENTRY_DSN", "  ")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_latency() {
        for bad in ["fast", "-5", "1.5"] {
            let err = config_from(&[("STOREFRONT_AUTH_LATENCY_MS", bad)]).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_AUTH_LATENCY_MS"
            ));
        }
    }
}
