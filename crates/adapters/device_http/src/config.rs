//! Device API configuration.

use std::time::Duration;

use serde::Deserialize;

/// Where the device API lives and how long to wait for it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceApiConfig {
    /// Base URL of the device-side server (e.g. `http://192.168.1.50:8080`).
    pub base_url: String,
    /// Per-request timeout, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for DeviceApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_ms: 2000,
        }
    }
}

impl DeviceApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
