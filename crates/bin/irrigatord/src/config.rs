//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `irrigator.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use irrigator_adapter_device_http::DeviceApiConfig;
use irrigator_app::poller::DEFAULT_POLL_INTERVAL;
use irrigator_domain::automation::{
    AutomationConfig, DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD, DEFAULT_MIN_COMMAND_INTERVAL,
};
use irrigator_domain::error::IrrigatorError;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Where the pump controller's API lives.
    pub device: DeviceApiConfig,
    /// Threshold automation and poll cadence.
    pub automation: AutomationSettings,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Automation settings as written in the file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AutomationSettings {
    pub low_threshold: f64,
    pub high_threshold: f64,
    /// Whether the automation starts enabled.
    pub enabled: bool,
    pub min_command_interval_ms: u64,
    pub poll_interval_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `irrigator.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("irrigator.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("IRRIGATOR_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("IRRIGATOR_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("IRRIGATOR_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("IRRIGATOR_DEVICE_URL") {
            self.device.base_url = val;
        }
        if let Some(val) = var("IRRIGATOR_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.automation.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_ms must be non-zero".to_string(),
            ));
        }
        self.automation_config()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Initial automation state for the irrigation service.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Automation`] if the thresholds are inverted or
    /// not finite.
    pub fn automation_config(&self) -> Result<AutomationConfig, ConfigError> {
        let settings = &self.automation;
        AutomationConfig::builder()
            .low_threshold(settings.low_threshold)
            .high_threshold(settings.high_threshold)
            .enabled(settings.enabled)
            .min_command_interval(Duration::from_millis(settings.min_command_interval_ms))
            .build()
            .map_err(ConfigError::Automation)
    }

    /// Period of the status poll.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.automation.poll_interval_ms)
    }

    /// Status page auto-refresh, in whole seconds, following the poll period.
    #[must_use]
    pub fn refresh_seconds(&self) -> u64 {
        self.automation.poll_interval_ms.div_ceil(1000).max(1)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            enabled: true,
            min_command_interval_ms: u64::try_from(DEFAULT_MIN_COMMAND_INTERVAL.as_millis())
                .unwrap_or(u64::MAX),
            poll_interval_ms: u64::try_from(DEFAULT_POLL_INTERVAL.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "irrigatord=info,irrigator=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Automation thresholds rejected by the domain.
    #[error("invalid automation settings")]
    Automation(#[source] IrrigatorError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
