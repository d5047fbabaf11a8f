//! # irrigator-adapter-device-http
//!
//! Device API adapter: talks to the pump controller's HTTP server.
//!
//! ## Endpoints consumed
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `GET` | `/api/status` | connectivity, raw soil reading, pump state, last update |
//! | `POST` | `/api/bomba/ligar` | turn the pump on |
//! | `POST` | `/api/bomba/desligar` | turn the pump off |
//!
//! Response bodies are decoded whatever the HTTP status code; a body that
//! is not the expected JSON is a transport error.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `irrigator-app` and `irrigator-domain`.

mod config;
mod error;
mod wire;

pub use config::DeviceApiConfig;
pub use error::DeviceApiError;

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use irrigator_app::ports::PumpController;
use irrigator_domain::error::IrrigatorError;
use irrigator_domain::pump::{CommandAck, PumpCommand};
use irrigator_domain::status::DeviceStatus;

use wire::{CommandResponse, StatusResponse};

const STATUS_PATH: &str = "/api/status";
const PUMP_ON_PATH: &str = "/api/bomba/ligar";
const PUMP_OFF_PATH: &str = "/api/bomba/desligar";

/// [`PumpController`] backed by the device's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPumpController {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPumpController {
    /// Build a controller for the API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceApiError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &DeviceApiConfig) -> Result<Self, DeviceApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(DeviceApiError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_status(&self) -> Result<DeviceStatus, DeviceApiError> {
        let body: StatusResponse = self.decode(self.client.get(self.url(STATUS_PATH))).await?;
        let status = DeviceStatus::from(body);
        tracing::debug!(
            connected = status.connected,
            raw = ?status.raw_value,
            pump = %status.pump,
            "device status"
        );
        Ok(status)
    }

    async fn post_command(&self, command: PumpCommand) -> Result<CommandAck, DeviceApiError> {
        let path = match command {
            PumpCommand::Activate => PUMP_ON_PATH,
            PumpCommand::Deactivate => PUMP_OFF_PATH,
        };
        let request = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json");
        let body: CommandResponse = self.decode(request).await?;
        Ok(body.into())
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DeviceApiError> {
        let response = request.send().await.map_err(|source| DeviceApiError::Request {
            url: source.url().map(ToString::to_string).unwrap_or_default(),
            source,
        })?;
        let url = response.url().to_string();
        if !response.status().is_success() {
            tracing::debug!(%url, status = %response.status(), "device answered with error status");
        }
        response
            .json()
            .await
            .map_err(|source| DeviceApiError::Decode { url, source })
    }
}

impl PumpController for HttpPumpController {
    async fn fetch_status(&self) -> Result<DeviceStatus, IrrigatorError> {
        Ok(self.get_status().await?)
    }

    async fn send_command(&self, command: PumpCommand) -> Result<CommandAck, IrrigatorError> {
        Ok(self.post_command(command).await?)
    }
}
