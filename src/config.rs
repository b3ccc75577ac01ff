//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: Server,

    /// Cart and rental ledger storage configuration.
    #[serde(default)]
    pub storage: Storage,

    /// In-memory session configuration.
    #[serde(default)]
    pub session: Session,

    /// Simulated payment configuration.
    #[serde(default)]
    pub payment: Payment,

    /// Tool suggestion backend configuration.
    #[serde(default)]
    pub suggest: Suggest,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the `RENTAL__`-prefixed environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("RENTAL")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8000)]
    pub port: u16,
}

/// Storage backend kind.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key under [`Storage::dir`].
    #[default]
    File,

    /// Process memory; lost on restart.
    Memory,
}

/// Storage configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Storage {
    pub backend: StorageBackend,

    /// Directory of the file backend.
    #[default(PathBuf::from("data"))]
    pub dir: PathBuf,

    /// Prefix of every storage key.
    #[default(crate::state::DEFAULT_NAMESPACE.to_owned())]
    pub namespace: String,
}

/// In-memory session configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Session {
    /// Sessions untouched for this long are dropped from memory.
    #[default(time::Duration::from_secs(30 * 60))]
    #[serde(with = "humantime_serde")]
    pub idle_timeout: time::Duration,

    /// Interval between two idle session sweeps.
    #[default(time::Duration::from_secs(60))]
    #[serde(with = "humantime_serde")]
    pub sweep_interval: time::Duration,
}

/// Simulated payment configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Payment {
    /// Artificial processing delay.
    #[default(time::Duration::from_millis(2500))]
    #[serde(with = "humantime_serde")]
    pub delay: time::Duration,

    /// Share of payments that succeed, between 0 and 1.
    #[default(0.8)]
    pub success_rate: f64,
}

/// Suggestion backend configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Suggest {
    /// Messages-style completion endpoint.
    #[default("https://api.anthropic.com/v1/messages".to_owned())]
    pub endpoint: String,

    /// Model requested from the endpoint.
    #[default("claude-sonnet-4-20250514".to_owned())]
    pub model: String,

    /// API key; suggestions fail with a service error when unset.
    pub api_key: Option<String>,

    /// Upper bound on the generated reply.
    #[default(1024)]
    pub max_tokens: u32,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::new("does-not-exist.toml").unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.namespace, "changChao");
        assert_eq!(config.payment.delay, time::Duration::from_millis(2500));
        assert!((config.payment.success_rate - 0.8).abs() < f64::EPSILON);
        assert!(config.suggest.api_key.is_none());
        assert_eq!(config.session.idle_timeout, time::Duration::from_secs(1800));
        assert_eq!(config.session.sweep_interval, time::Duration::from_secs(60));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rental.toml");
        std::fs::write(
            &path,
            r#"
            [storage]
            backend = "memory"

            [session]
            idle_timeout = "5m"

            [payment]
            delay = "10ms"
            success_rate = 1.0

            [log]
            level = "DEBUG"
            "#,
        )
        .unwrap();

        let config = Config::new(path.to_str().unwrap()).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.payment.delay, time::Duration::from_millis(10));
        assert_eq!(config.session.idle_timeout, time::Duration::from_secs(300));
        assert_eq!(config.session.sweep_interval, time::Duration::from_secs(60));
        assert!(matches!(config.log.level, LogLevel::Debug));
        // Untouched sections keep their defaults.
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
