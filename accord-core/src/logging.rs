//! Subscriber setup for applications embedding accord.
//!
//! The negotiation code only emits `tracing` events; nothing is printed
//! until a subscriber is installed. [`LogConfig`] installs a
//! `tracing-subscriber` fmt layer behind an [`EnvFilter`], so `RUST_LOG`
//! always overrides the configured level.
//!
//! ```no_run
//! use accord_core::logging::{LogConfig, LogFormat, LogLevel};
//!
//! LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Pretty)
//!     .with_env_filter("accord_core=trace")
//!     .try_init()
//!     .expect("subscriber already installed");
//! ```

use crate::config::ENV_PREFIX;
use crate::error::ConfigError;
use std::env;
use std::io;
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log level for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to a tracing level.
    pub fn to_tracing_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    /// Directive form, as understood by [`EnvFilter`].
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidValue {
                key: format!("{}_LOG_LEVEL", ENV_PREFIX),
                value: s.to_string(),
            }),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured, one JSON object per event.
    Json,
    /// Multi-line, for local development.
    Pretty,
    /// Single line, minimal.
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(ConfigError::InvalidValue {
                key: format!("{}_LOG_FORMAT", ENV_PREFIX),
                value: s.to_string(),
            }),
        }
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

/// Raised when a global subscriber is already installed or the filter is
/// invalid.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Include the event target (module path).
    pub targets: bool,
    /// Include thread IDs.
    pub thread_ids: bool,
    /// Enable ANSI colors. Ignored for JSON.
    pub colors: bool,
    /// Explicit filter directives; takes precedence over `level`.
    pub env_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            output: LogOutput::Stdout,
            targets: true,
            thread_ids: false,
            colors: false,
            env_filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `ACCORD_LOG_LEVEL`, `ACCORD_LOG_FORMAT` and `ACCORD_LOG_FILTER`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(format!("{}_{}", ENV_PREFIX, key)).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary lookup (keys
    /// without prefix).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = lookup("LOG_LEVEL") {
            config.level = level.parse()?;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.format = format.parse()?;
        }
        if let Some(filter) = lookup("LOG_FILTER") {
            config.env_filter = Some(filter);
        }
        Ok(config)
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_targets(mut self, enable: bool) -> Self {
        self.targets = enable;
        self
    }

    pub fn with_thread_ids(mut self, enable: bool) -> Self {
        self.thread_ids = enable;
        self
    }

    pub fn with_colors(mut self, enable: bool) -> Self {
        self.colors = enable;
        self
    }

    /// Set filter directives such as `"accord_core=debug,hyper=info"`.
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Directives the filter is built from when `RUST_LOG` is unset.
    pub fn directives(&self) -> String {
        self.env_filter
            .clone()
            .unwrap_or_else(|| self.level.as_str().to_string())
    }

    /// Build the event filter. `RUST_LOG` wins over the configured directives.
    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        let directives = self.directives();
        EnvFilter::try_new(&directives).map_err(|e| LoggingError::InvalidFilter {
            filter: directives,
            reason: e.to_string(),
        })
    }

    /// Install the global subscriber.
    pub fn try_init(self) -> Result<(), LoggingError> {
        let filter = self.filter()?;
        match self.output {
            LogOutput::Stdout => self.install(io::stdout, filter),
            LogOutput::Stderr => self.install(io::stderr, filter),
        }
    }

    fn install<W>(&self, writer: W, filter: EnvFilter) -> Result<(), LoggingError>
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let registry = tracing_subscriber::registry().with(filter);
        match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids),
                )
                .try_init()?,
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids)
                        .with_ansi(self.colors),
                )
                .try_init()?,
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids)
                        .with_ansi(self.colors),
                )
                .try_init()?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Trace.to_tracing_level(), Level::TRACE);
        assert_eq!(LogLevel::Warn.to_tracing_level(), Level::WARN);
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_parse_level_and_format() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);

        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid value 'loud' for ACCORD_LOG_LEVEL");
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stdout);
        assert!(config.targets);
        assert_eq!(config.directives(), "info");
    }

    #[test]
    fn test_config_builder() {
        let config = LogConfig::new()
            .level(LogLevel::Trace)
            .format(LogFormat::Pretty)
            .output(LogOutput::Stderr)
            .with_targets(false)
            .with_thread_ids(true)
            .with_colors(true)
            .with_env_filter("accord_core=debug");

        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.output, LogOutput::Stderr);
        assert!(!config.targets);
        assert!(config.thread_ids);
        assert!(config.colors);
        assert_eq!(config.directives(), "accord_core=debug");
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [("LOG_LEVEL", "debug"), ("LOG_FORMAT", "compact")]
            .into_iter()
            .collect();
        let config = LogConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn test_from_lookup_rejects_unknown_format() {
        let result = LogConfig::from_lookup(|key| (key == "LOG_FORMAT").then(|| "xml".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_filter_builds_from_directives() {
        if env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(LogConfig::new().with_env_filter("accord_core=debug").filter().is_ok());
    }
}
