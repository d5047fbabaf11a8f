//! The automation evaluator.

use serde::Serialize;

use super::AutomationConfig;
use crate::pump::PumpCommand;
use crate::status::DeviceStatus;
use crate::time::Timestamp;

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    ActivatePump,
    DeactivatePump,
    NoAction(NoActionReason),
}

/// Why an evaluation produced no command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoActionReason {
    Disabled,
    Disconnected,
    NoReading,
    Debounced,
    WithinBand,
}

impl Decision {
    /// The pump command to send, if any.
    #[must_use]
    pub fn command(self) -> Option<PumpCommand> {
        match self {
            Self::ActivatePump => Some(PumpCommand::Activate),
            Self::DeactivatePump => Some(PumpCommand::Deactivate),
            Self::NoAction(_) => None,
        }
    }
}

/// Decide whether the pump should be switched, given the latest status.
///
/// Pure: the caller records accepted commands with
/// [`AutomationConfig::record_command`].
#[must_use]
pub fn evaluate(config: &AutomationConfig, status: &DeviceStatus, now: Timestamp) -> Decision {
    if !config.enabled {
        return Decision::NoAction(NoActionReason::Disabled);
    }
    if !status.connected {
        return Decision::NoAction(NoActionReason::Disconnected);
    }
    let Some(raw) = status.raw_value else {
        return Decision::NoAction(NoActionReason::NoReading);
    };
    if config.is_debounced(now) {
        return Decision::NoAction(NoActionReason::Debounced);
    }

    if !status.pump_on() && raw <= config.low_threshold {
        Decision::ActivatePump
    } else if status.pump_on() && raw >= config.high_threshold {
        Decision::DeactivatePump
    } else {
        Decision::NoAction(NoActionReason::WithinBand)
    }
}
