//! Negotiation settings.
//!
//! Settings can be built in code, read from a TOML document, or taken from
//! `ACCORD_*` environment variables.
//!
//! ```
//! use accord_core::config::NegotiationConfig;
//!
//! let config = NegotiationConfig::from_toml_str("max_media_ranges = 16").unwrap();
//! assert_eq!(config.max_media_ranges, 16);
//! assert_eq!(config.max_header_len, 8192);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable prefix for negotiation settings.
pub const ENV_PREFIX: &str = "ACCORD";

/// Limits and defaults applied while parsing negotiation headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// Longest `Accept` header (in bytes) that will be parsed.
    pub max_header_len: usize,
    /// Number of media ranges considered per `Accept` header.
    pub max_media_ranges: usize,
    /// Treat a blank `Accept` header as `*/*`.
    pub blank_accept_matches_any: bool,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            max_header_len: 8192,
            max_media_ranges: 64,
            blank_accept_matches_any: true,
        }
    }
}

impl NegotiationConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header length limit.
    pub fn max_header_len(mut self, len: usize) -> Self {
        self.max_header_len = len;
        self
    }

    /// Set the media range limit.
    pub fn max_media_ranges(mut self, count: usize) -> Self {
        self.max_media_ranges = count;
        self
    }

    /// Choose how a blank `Accept` header is treated.
    pub fn blank_accept_matches_any(mut self, enabled: bool) -> Self {
        self.blank_accept_matches_any = enabled;
        self
    }

    /// Parse settings from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from `ACCORD_*` environment variables.
    ///
    /// - `ACCORD_MAX_HEADER_LEN`
    /// - `ACCORD_MAX_MEDIA_RANGES`
    /// - `ACCORD_BLANK_ACCEPT_MATCHES_ANY` (`1`/`true`/`0`/`false`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(format!("{}_{}", ENV_PREFIX, key)).ok())
    }

    /// Load settings through an arbitrary key lookup (keys without prefix).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("MAX_HEADER_LEN") {
            config.max_header_len = parse_usize("MAX_HEADER_LEN", &value)?;
        }
        if let Some(value) = lookup("MAX_MEDIA_RANGES") {
            config.max_media_ranges = parse_usize("MAX_MEDIA_RANGES", &value)?;
        }
        if let Some(value) = lookup("BLANK_ACCEPT_MATCHES_ANY") {
            config.blank_accept_matches_any = parse_bool("BLANK_ACCEPT_MATCHES_ANY", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject limits that would make every negotiation fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_header_len == 0 {
            return Err(ConfigError::ValidationError(
                "max_header_len must be greater than zero".to_string(),
            ));
        }
        if self.max_media_ranges == 0 {
            return Err(ConfigError::ValidationError(
                "max_media_ranges must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: format!("{}_{}", ENV_PREFIX, key),
        value: value.to_string(),
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}
