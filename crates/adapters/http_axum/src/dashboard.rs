//! Server-side rendered status page (no JavaScript).
//!
//! The page reloads itself at the poll period. Buttons are plain `<form>`
//! elements that POST back and redirect to `/` (PRG pattern); the outcome of
//! a command shows up in the notification list on the next render.

use askama::Template;
use axum::Router;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use chrono::Local;

use irrigator_app::ports::PumpController;
use irrigator_app::services::irrigation_service::ControllerSnapshot;
use irrigator_domain::notification::{Notification, NotificationKind};
use irrigator_domain::pump::PumpCommand;

use crate::state::AppState;

/// One notification as the page shows it.
pub struct NotificationView {
    class: &'static str,
    message: String,
}

impl From<&Notification> for NotificationView {
    fn from(note: &Notification) -> Self {
        let class = match note.kind {
            NotificationKind::Error => "error-message",
            NotificationKind::Automation | NotificationKind::Manual => "automation-message",
        };
        Self {
            class,
            message: note.message.clone(),
        }
    }
}

/// Status page template.
#[derive(Template)]
#[template(path = "status.html")]
pub struct StatusTemplate {
    refresh_seconds: u64,
    connected: bool,
    reading: String,
    pump_on: bool,
    last_update: Option<String>,
    notifications: Vec<NotificationView>,
    automation_enabled: bool,
    low_threshold: f64,
    high_threshold: f64,
}

impl StatusTemplate {
    /// Build the page model from a controller snapshot.
    #[must_use]
    pub fn new(snapshot: &ControllerSnapshot, refresh_seconds: u64) -> Self {
        let status = &snapshot.status;
        Self {
            refresh_seconds,
            connected: status.connected,
            reading: status
                .raw_value
                .map_or_else(|| "--".to_string(), |v| v.to_string()),
            pump_on: status.pump_on(),
            last_update: status
                .last_update
                .map(|ts| ts.with_timezone(&Local).format("%H:%M:%S").to_string()),
            notifications: snapshot.notifications.iter().map(Into::into).collect(),
            automation_enabled: snapshot.automation.enabled,
            low_threshold: snapshot.automation.low_threshold,
            high_threshold: snapshot.automation.high_threshold,
        }
    }
}

impl IntoResponse for StatusTemplate {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// Build the status page sub-router.
pub fn routes<C>() -> Router<AppState<C>>
where
    C: PumpController + 'static,
{
    Router::new()
        .route("/", get(index::<C>))
        .route("/pump/on", post(pump_on::<C>))
        .route("/pump/off", post(pump_off::<C>))
        .route("/automation/toggle", post(toggle_automation::<C>))
}

/// `GET /`: current device and automation state.
pub async fn index<C>(State(state): State<AppState<C>>) -> StatusTemplate
where
    C: PumpController + 'static,
{
    StatusTemplate::new(&state.service.snapshot(), state.refresh_seconds)
}

/// `POST /pump/on`: manual override, then back to `/`.
pub async fn pump_on<C>(State(state): State<AppState<C>>) -> Redirect
where
    C: PumpController + 'static,
{
    manual(&state, PumpCommand::Activate).await
}

/// `POST /pump/off`: manual override, then back to `/`.
pub async fn pump_off<C>(State(state): State<AppState<C>>) -> Redirect
where
    C: PumpController + 'static,
{
    manual(&state, PumpCommand::Deactivate).await
}

async fn manual<C>(state: &AppState<C>, command: PumpCommand) -> Redirect
where
    C: PumpController + 'static,
{
    // The failure is already on the notification board; the redirect shows it.
    if let Err(err) = state.service.manual_command(command).await {
        tracing::debug!(%command, error = %err, "manual command from status page failed");
    }
    Redirect::to("/")
}

/// `POST /automation/toggle`: flip the automation, then back to `/`.
pub async fn toggle_automation<C>(State(state): State<AppState<C>>) -> Redirect
where
    C: PumpController + 'static,
{
    state.service.toggle_automation();
    Redirect::to("/")
}
