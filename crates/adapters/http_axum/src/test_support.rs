//! Shared fixtures for router, API, and page tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::response::Response;
use http_body_util::BodyExt;

use irrigator_app::ports::PumpController;
use irrigator_app::services::irrigation_service::IrrigationService;
use irrigator_domain::automation::AutomationConfig;
use irrigator_domain::error::IrrigatorError;
use irrigator_domain::pump::{CommandAck, PumpCommand, PumpState};
use irrigator_domain::status::DeviceStatus;

use crate::state::AppState;

/// Device stub; `None` answers mean "unreachable".
pub struct StubDevice {
    pub status: Mutex<Option<DeviceStatus>>,
    pub ack: Mutex<Option<CommandAck>>,
    pub sent: Mutex<Vec<PumpCommand>>,
}

impl Default for StubDevice {
    fn default() -> Self {
        Self {
            status: Mutex::new(None),
            ack: Mutex::new(Some(CommandAck::accepted())),
            sent: Mutex::new(Vec::new()),
        }
    }
}

fn unreachable() -> IrrigatorError {
    IrrigatorError::Transport(Box::new(std::io::Error::other("unreachable")))
}

impl PumpController for StubDevice {
    fn fetch_status(&self) -> impl Future<Output = Result<DeviceStatus, IrrigatorError>> + Send {
        let r = self.status.lock().unwrap().clone().ok_or_else(unreachable);
        async { r }
    }

    fn send_command(
        &self,
        command: PumpCommand,
    ) -> impl Future<Output = Result<CommandAck, IrrigatorError>> + Send {
        self.sent.lock().unwrap().push(command);
        let r = self.ack.lock().unwrap().clone().ok_or_else(unreachable);
        async { r }
    }
}

pub type TestState = AppState<Arc<StubDevice>>;

/// State around a device that has never been polled.
pub fn test_state() -> (Arc<StubDevice>, TestState) {
    let device = Arc::new(StubDevice::default());
    let service = IrrigationService::new(Arc::clone(&device), AutomationConfig::default());
    (device, AppState::new(Arc::new(service), 3))
}

/// State around a device that reported `raw`/`pump` on one poll.
pub async fn polled_state(raw: f64, pump: PumpState) -> (Arc<StubDevice>, TestState) {
    let (device, state) = test_state();
    *device.status.lock().unwrap() = Some(DeviceStatus {
        connected: true,
        raw_value: Some(raw),
        pump,
        last_update: None,
    });
    state.service.tick().await;
    (device, state)
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn empty_post(uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
