//! Automation: a rate-limited threshold trigger for the irrigation pump.
//!
//! The pump is switched on when the soil reading falls to the low threshold
//! and switched off once it climbs back to the high threshold. The gap
//! between the two (the hysteresis band) keeps the pump from oscillating
//! around a single value, and a minimum interval between automation-issued
//! commands (the debounce window) keeps it from being hammered while the
//! device catches up.

mod decision;

pub use decision::{Decision, NoActionReason, evaluate};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{IrrigatorError, ValidationError};
use crate::time::{Timestamp, duration_ms};

/// Pump switches on at or below this reading by default.
pub const DEFAULT_LOW_THRESHOLD: f64 = 300.0;
/// Pump switches off at or above this reading by default.
pub const DEFAULT_HIGH_THRESHOLD: f64 = 350.0;
/// Default minimum time between two automation-issued commands.
pub const DEFAULT_MIN_COMMAND_INTERVAL: Duration = Duration::from_millis(5000);

/// Mutable automation state, owned by the irrigation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationConfig {
    pub low_threshold: f64,
    pub high_threshold: f64,
    pub enabled: bool,
    #[serde(with = "duration_ms")]
    pub min_command_interval: Duration,
    /// When the automation last issued a command the device accepted.
    pub last_command_at: Option<Timestamp>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            enabled: true,
            min_command_interval: DEFAULT_MIN_COMMAND_INTERVAL,
            last_command_at: None,
        }
    }
}

impl AutomationConfig {
    /// Create a builder for constructing an [`AutomationConfig`].
    #[must_use]
    pub fn builder() -> AutomationConfigBuilder {
        AutomationConfigBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`IrrigatorError::Validation`] when:
    /// - a threshold is not finite ([`ValidationError::NonFiniteThreshold`])
    /// - `low_threshold >= high_threshold` ([`ValidationError::InvertedThresholds`])
    pub fn validate(&self) -> Result<(), IrrigatorError> {
        if !self.low_threshold.is_finite() || !self.high_threshold.is_finite() {
            return Err(ValidationError::NonFiniteThreshold.into());
        }
        if self.low_threshold >= self.high_threshold {
            return Err(ValidationError::InvertedThresholds {
                low: self.low_threshold,
                high: self.high_threshold,
            }
            .into());
        }
        Ok(())
    }

    /// Whether `now` still falls inside the debounce window of the last
    /// accepted command.
    ///
    /// A `now` earlier than the last command counts as inside the window.
    #[must_use]
    pub fn is_debounced(&self, now: Timestamp) -> bool {
        let Some(last) = self.last_command_at else {
            return false;
        };
        match now.signed_duration_since(last).to_std() {
            Ok(elapsed) => elapsed < self.min_command_interval,
            Err(_) => true,
        }
    }

    /// Remember that the device accepted an automation command at `now`.
    pub fn record_command(&mut self, now: Timestamp) {
        self.last_command_at = Some(now);
    }

    /// Flip the enabled flag and return the new value.
    ///
    /// `last_command_at` is left untouched.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }
}

/// Step-by-step builder for [`AutomationConfig`].
#[derive(Debug, Default)]
pub struct AutomationConfigBuilder {
    low_threshold: Option<f64>,
    high_threshold: Option<f64>,
    enabled: Option<bool>,
    min_command_interval: Option<Duration>,
    last_command_at: Option<Timestamp>,
}

impl AutomationConfigBuilder {
    #[must_use]
    pub fn low_threshold(mut self, value: f64) -> Self {
        self.low_threshold = Some(value);
        self
    }

    #[must_use]
    pub fn high_threshold(mut self, value: f64) -> Self {
        self.high_threshold = Some(value);
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn min_command_interval(mut self, interval: Duration) -> Self {
        self.min_command_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn last_command_at(mut self, ts: Timestamp) -> Self {
        self.last_command_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`IrrigatorError::Validation`] if the thresholds do not form a
    /// valid hysteresis band.
    pub fn build(self) -> Result<AutomationConfig, IrrigatorError> {
        let config = AutomationConfig {
            low_threshold: self.low_threshold.unwrap_or(DEFAULT_LOW_THRESHOLD),
            high_threshold: self.high_threshold.unwrap_or(DEFAULT_HIGH_THRESHOLD),
            enabled: self.enabled.unwrap_or(true),
            min_command_interval: self
                .min_command_interval
                .unwrap_or(DEFAULT_MIN_COMMAND_INTERVAL),
            last_command_at: self.last_command_at,
        };
        config.validate()?;
        Ok(config)
    }
}
