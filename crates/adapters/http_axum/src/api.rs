//! JSON control API.

#![allow(clippy::missing_errors_doc)]

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use irrigator_app::ports::PumpController;
use irrigator_app::services::irrigation_service::ControllerSnapshot;
use irrigator_domain::automation::AutomationConfig;
use irrigator_domain::pump::PumpCommand;

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned by the manual pump endpoints.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

/// Request body for `PUT /api/automation`.
#[derive(Debug, Deserialize)]
pub struct SetAutomationRequest {
    pub enabled: bool,
}

/// Body returned after the automation flag changes.
#[derive(Debug, Serialize)]
pub struct AutomationToggled {
    pub enabled: bool,
}

/// Build the `/api` sub-router.
pub fn routes<C>() -> Router<AppState<C>>
where
    C: PumpController + 'static,
{
    Router::new()
        .route("/state", get(snapshot::<C>))
        .route("/pump/on", post(pump_on::<C>))
        .route("/pump/off", post(pump_off::<C>))
        .route(
            "/automation",
            get(automation::<C>).put(set_automation::<C>),
        )
        .route("/automation/toggle", post(toggle_automation::<C>))
}

/// `GET /api/state`: connectivity, last status, automation, notifications.
pub async fn snapshot<C>(State(state): State<AppState<C>>) -> Json<ControllerSnapshot>
where
    C: PumpController + 'static,
{
    Json(state.service.snapshot())
}

/// `POST /api/pump/on`: turn the pump on, bypassing the automation.
pub async fn pump_on<C>(
    State(state): State<AppState<C>>,
) -> Result<Json<CommandResponse>, ApiError>
where
    C: PumpController + 'static,
{
    manual(&state, PumpCommand::Activate).await
}

/// `POST /api/pump/off`: turn the pump off, bypassing the automation.
pub async fn pump_off<C>(
    State(state): State<AppState<C>>,
) -> Result<Json<CommandResponse>, ApiError>
where
    C: PumpController + 'static,
{
    manual(&state, PumpCommand::Deactivate).await
}

async fn manual<C>(
    state: &AppState<C>,
    command: PumpCommand,
) -> Result<Json<CommandResponse>, ApiError>
where
    C: PumpController + 'static,
{
    let ack = state.service.manual_command(command).await?;
    Ok(Json(CommandResponse {
        success: ack.success,
        message: ack.message,
    }))
}

/// `GET /api/automation`: thresholds, flag, and last command time.
pub async fn automation<C>(State(state): State<AppState<C>>) -> Json<AutomationConfig>
where
    C: PumpController + 'static,
{
    Json(state.service.snapshot().automation)
}

/// `PUT /api/automation`: enable or disable the automation.
pub async fn set_automation<C>(
    State(state): State<AppState<C>>,
    Json(body): Json<SetAutomationRequest>,
) -> Json<AutomationToggled>
where
    C: PumpController + 'static,
{
    let enabled = state.service.set_automation_enabled(body.enabled);
    Json(AutomationToggled { enabled })
}

/// `POST /api/automation/toggle`: flip the automation flag.
pub async fn toggle_automation<C>(State(state): State<AppState<C>>) -> Json<AutomationToggled>
where
    C: PumpController + 'static,
{
    let enabled = state.service.toggle_automation();
    Json(AutomationToggled { enabled })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use irrigator_domain::pump::{CommandAck, PumpState};
    use tower::ServiceExt;

    use crate::router;
    use crate::test_support::{body_string, empty_post, polled_state, test_state};

    use super::*;

    async fn json(response: axum::response::Response) -> serde_json::Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn should_return_snapshot_of_last_poll() {
        let (_, state) = polled_state(321.0, PumpState::On).await;
        let response = router::build(state)
            .oneshot(
                Request::builder()
                    .uri("/api/state")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["status"]["connected"], true);
        assert_eq!(body["status"]["raw_value"], 321.0);
        assert_eq!(body["status"]["pump"], "ON");
        assert_eq!(body["automation"]["low_threshold"], 300.0);
        assert_eq!(body["automation"]["high_threshold"], 350.0);
        assert!(body["last_poll_at"].is_string());
    }

    #[tokio::test]
    async fn should_turn_pump_on_manually() {
        let (device, state) = polled_state(320.0, PumpState::Off).await;
        let response = router::build(state)
            .oneshot(empty_post("/api/pump/on"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["success"], true);
        assert_eq!(*device.sent.lock().unwrap(), vec![PumpCommand::Activate]);
    }

    #[tokio::test]
    async fn should_turn_pump_off_manually() {
        let (device, state) = polled_state(320.0, PumpState::On).await;
        let response = router::build(state)
            .oneshot(empty_post("/api/pump/off"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*device.sent.lock().unwrap(), vec![PumpCommand::Deactivate]);
    }

    #[tokio::test]
    async fn should_return_conflict_when_device_never_connected() {
        let (device, state) = test_state();
        let response = router::build(state)
            .oneshot(empty_post("/api/pump/on"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json(response).await["error"], "device is not connected");
        assert!(device.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_bad_gateway_with_device_message_when_rejected() {
        let (device, state) = polled_state(320.0, PumpState::Off).await;
        *device.ack.lock().unwrap() = Some(CommandAck::rejected("Arduino não conectado"));

        let response = router::build(state)
            .oneshot(empty_post("/api/pump/on"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json(response).await["error"], "Arduino não conectado");
    }

    #[tokio::test]
    async fn should_hide_transport_details_from_clients() {
        let (device, state) = polled_state(320.0, PumpState::Off).await;
        *device.ack.lock().unwrap() = None;

        let response = router::build(state)
            .oneshot(empty_post("/api/pump/off"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json(response).await["error"], "device unreachable");
    }

    #[tokio::test]
    async fn should_toggle_automation() {
        let (_, state) = test_state();
        let app = router::build(state.clone());

        let response = app
            .oneshot(empty_post("/api/automation/toggle"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["enabled"], false);
        assert!(!state.service.snapshot().automation.enabled);
    }

    #[tokio::test]
    async fn should_set_automation_flag_from_json_body() {
        let (_, state) = test_state();
        state.service.set_automation_enabled(false);

        let response = router::build(state.clone())
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/automation")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"enabled":true}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["enabled"], true);
        assert!(state.service.snapshot().automation.enabled);
    }

    #[tokio::test]
    async fn should_reject_malformed_automation_body() {
        let (_, state) = test_state();
        let response = router::build(state)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/automation")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"enabled":"maybe"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn should_return_automation_config() {
        let (_, state) = test_state();
        let response = router::build(state)
            .oneshot(
                Request::builder()
                    .uri("/api/automation")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = json(response).await;
        assert_eq!(body["enabled"], true);
        assert_eq!(body["min_command_interval"], 5000);
        assert!(body["last_command_at"].is_null());
    }
}
