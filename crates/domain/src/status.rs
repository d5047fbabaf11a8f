//! Device status: the snapshot returned by each poll of the device API.

use serde::{Deserialize, Serialize};

use crate::pump::PumpState;
use crate::time::Timestamp;

/// Latest connectivity, sensor, and actuator state reported by the device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Whether the device-side server can talk to the microcontroller.
    pub connected: bool,
    /// Raw soil-moisture reading, absent when the device has none yet.
    pub raw_value: Option<f64>,
    pub pump: PumpState,
    /// When the device last refreshed its readings.
    pub last_update: Option<Timestamp>,
}

impl DeviceStatus {
    /// The status assumed when the device API cannot be reached.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pump_on(&self) -> bool {
        self.pump.is_on()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_disconnected_without_reading() {
        let status = DeviceStatus::disconnected();
        assert!(!status.connected);
        assert!(status.raw_value.is_none());
        assert!(!status.pump_on());
        assert!(status.last_update.is_none());
    }

    #[test]
    fn should_report_pump_on_from_state() {
        let status = DeviceStatus {
            connected: true,
            raw_value: Some(310.0),
            pump: PumpState::On,
            last_update: None,
        };
        assert!(status.pump_on());
    }
}
