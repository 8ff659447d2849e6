//! Environment-based Configuration for bitkey
//!
//! Nothing here is secret: private keys never come from the environment,
//! they are passed to the wallet constructors explicitly.
//!
//! # Environment Variables
//!
//! ## Chain Data
//! - `BITKEY_MAIN_API` - Esplora API endpoint for mainnet (default: blockstream.info)
//! - `BITKEY_TEST_API` - Esplora API endpoint for testnet (default: blockstream.info/testnet)
//! - `BITKEY_TIMEOUT_SECS` - HTTP request timeout in seconds (default: 30)
//!
//! ## Keys
//! - `BITKEY_COMPRESSED` - Serialization default for generated and raw-key
//!   wallets, "1"/"true" or "0"/"false" (default: true)
//!
//! ## Logging
//! - `BITKEY_LOG_LEVEL` - Logging level (trace, debug, info, warn, error)
//! - `BITKEY_LOG_JSON` - Set to "1" for JSON log output

use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::types::Network;

/// Default Esplora endpoints
pub const DEFAULT_MAIN_API: &str = "https://blockstream.info/api";
pub const DEFAULT_TEST_API: &str = "https://blockstream.info/testnet/api";

/// Default HTTP timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Esplora API endpoint for mainnet
    pub main_api: String,

    /// Esplora API endpoint for testnet
    pub test_api: String,

    /// HTTP request timeout
    pub timeout: Duration,

    /// Compression default for wallets not imported from WIF
    pub compressed: bool,

    /// Log level
    pub log_level: String,

    /// Emit JSON logs
    pub log_json: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            main_api: DEFAULT_MAIN_API.to_string(),
            test_api: DEFAULT_TEST_API.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            compressed: true,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl WalletConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let main_api = lookup("BITKEY_MAIN_API").unwrap_or(defaults.main_api);
        let test_api = lookup("BITKEY_TEST_API").unwrap_or(defaults.test_api);

        let timeout = match lookup("BITKEY_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ConfigError::InvalidValue(
                        "BITKEY_TIMEOUT_SECS".to_string(),
                        "must be a number".to_string(),
                    )
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue(
                        "BITKEY_TIMEOUT_SECS".to_string(),
                        "must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.timeout,
        };

        let compressed = match lookup("BITKEY_COMPRESSED") {
            Some(raw) => parse_flag("BITKEY_COMPRESSED", &raw)?,
            None => defaults.compressed,
        };

        let log_level = lookup("BITKEY_LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_json = lookup("BITKEY_LOG_JSON").map(|v| v == "1").unwrap_or(false);

        for (name, url) in [("BITKEY_MAIN_API", &main_api), ("BITKEY_TEST_API", &test_api)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue(
                    name.to_string(),
                    format!("not an http(s) URL: {}", url),
                ));
            }
        }

        Ok(Self {
            main_api,
            test_api,
            timeout,
            compressed,
            log_level,
            log_json,
        })
    }

    /// Esplora endpoint for a network
    pub fn api_url(&self, network: Network) -> &str {
        match network {
            Network::Main => &self.main_api,
            Network::Test => &self.test_api,
        }
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("expected a boolean, got {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WalletConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, WalletConfig::default());
        assert_eq!(config.api_url(Network::Main), DEFAULT_MAIN_API);
        assert_eq!(config.api_url(Network::Test), DEFAULT_TEST_API);
        assert!(config.compressed);
    }

    #[test]
    fn test_overrides() {
        let config = WalletConfig::from_lookup(lookup_from(&[
            ("BITKEY_MAIN_API", "http://localhost:3002"),
            ("BITKEY_TIMEOUT_SECS", "5"),
            ("BITKEY_COMPRESSED", "false"),
            ("BITKEY_LOG_JSON", "1"),
        ]))
        .unwrap();

        assert_eq!(config.api_url(Network::Main), "http://localhost:3002");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.compressed);
        assert!(config.log_json);
    }

    #[test]
    fn test_invalid_values() {
        assert!(WalletConfig::from_lookup(lookup_from(&[("BITKEY_TIMEOUT_SECS", "soon")])).is_err());
        assert!(WalletConfig::from_lookup(lookup_from(&[("BITKEY_TIMEOUT_SECS", "0")])).is_err());
        assert!(WalletConfig::from_lookup(lookup_from(&[("BITKEY_COMPRESSED", "maybe")])).is_err());
        assert!(WalletConfig::from_lookup(lookup_from(&[("BITKEY_TEST_API", "ftp://x")])).is_err());
    }
}
