//! Irrigation service: poll tick, automation, and manual override.
//!
//! All mutable state (automation config, last status, notifications) lives
//! behind one mutex that is never held across an `.await`; calls to the
//! device are the only suspension points.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use irrigator_domain::automation::{AutomationConfig, Decision, evaluate};
use irrigator_domain::error::IrrigatorError;
use irrigator_domain::notification::{Notification, NotificationBoard};
use irrigator_domain::pump::{CommandAck, PumpCommand};
use irrigator_domain::status::DeviceStatus;
use irrigator_domain::time::{Timestamp, now};

use crate::ports::PumpController;

const COMMUNICATION_ERROR: &str = "communication error with the server";
const DEVICE_DISCONNECTED: &str = "device disconnected";
const DEVICE_NOT_CONNECTED: &str = "device not connected";

/// What a single poll tick ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The status could not be fetched; the device is now considered
    /// disconnected.
    PollFailed,
    /// The status was refreshed and the automation decided not to act.
    Evaluated(Decision),
    /// The automation sent a command and the device accepted it.
    CommandSent(PumpCommand),
    /// The automation sent a command that was rejected or never arrived.
    CommandFailed(PumpCommand),
}

/// Everything needed to render the controller's current state.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub status: DeviceStatus,
    pub automation: AutomationConfig,
    pub notifications: Vec<Notification>,
    pub last_poll_at: Option<Timestamp>,
}

struct ControllerState {
    automation: AutomationConfig,
    status: DeviceStatus,
    last_poll_at: Option<Timestamp>,
    board: NotificationBoard,
}

/// Application service driving the pump from device status.
pub struct IrrigationService<C> {
    controller: C,
    state: Mutex<ControllerState>,
}

impl<C: PumpController> IrrigationService<C> {
    /// Create a new service talking to `controller`, starting from
    /// `automation` and an unknown (disconnected) device.
    pub fn new(controller: C, automation: AutomationConfig) -> Self {
        Self {
            controller,
            state: Mutex::new(ControllerState {
                automation,
                status: DeviceStatus::disconnected(),
                last_poll_at: None,
                board: NotificationBoard::default(),
            }),
        }
    }

    /// Run one poll cycle at the current time.
    pub async fn tick(&self) -> TickOutcome {
        self.tick_at(now()).await
    }

    /// Run one poll cycle as if the clock read `now`.
    ///
    /// Never fails: poll and command errors become notifications and the
    /// next tick simply tries again.
    pub async fn tick_at(&self, now: Timestamp) -> TickOutcome {
        let status = match self.controller.fetch_status().await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(error = %err, "status poll failed");
                let mut state = self.lock_state();
                state.status.connected = false;
                state.last_poll_at = Some(now);
                state.board.post(Notification::error(COMMUNICATION_ERROR, now));
                return TickOutcome::PollFailed;
            }
        };

        let (decision, raw) = {
            let mut state = self.lock_state();
            state.board.prune(now);
            if status.connected {
                state.board.clear_banner();
            } else {
                state.board.post(Notification::error(DEVICE_DISCONNECTED, now));
            }
            state.status = status;
            state.last_poll_at = Some(now);
            (
                evaluate(&state.automation, &state.status, now),
                state.status.raw_value,
            )
        };

        let Some(command) = decision.command() else {
            tracing::debug!(?decision, ?raw, "automation: no action");
            return TickOutcome::Evaluated(decision);
        };

        tracing::info!(%command, ?raw, "automation: switching pump");
        let reading = raw.map_or_else(|| "--".to_string(), |v| v.to_string());
        match self.controller.send_command(command).await {
            Ok(ack) if ack.success => {
                let mut state = self.lock_state();
                state.automation.record_command(now);
                let message = match command {
                    PumpCommand::Activate => {
                        format!("Automation: pump turned on - dry soil ({reading})")
                    }
                    PumpCommand::Deactivate => {
                        format!("Automation: pump turned off - moist soil ({reading})")
                    }
                };
                state.board.post(Notification::automation(message, now));
                TickOutcome::CommandSent(command)
            }
            Ok(ack) => {
                tracing::warn!(%command, message = ?ack.message, "automation command rejected");
                let message = ack
                    .message
                    .unwrap_or_else(|| format!("automation could not {command} the pump"));
                self.lock_state()
                    .board
                    .post(Notification::error(message, now));
                TickOutcome::CommandFailed(command)
            }
            Err(err) => {
                tracing::error!(%command, error = %err, "automation command failed");
                self.lock_state().board.post(Notification::error(
                    format!("automation could not {command} the pump"),
                    now,
                ));
                TickOutcome::CommandFailed(command)
            }
        }
    }

    /// Send a pump command directly, bypassing the automation.
    ///
    /// Does not touch the automation's debounce window.
    ///
    /// # Errors
    ///
    /// - [`IrrigatorError::NotConnected`] if the last poll saw the device
    ///   disconnected (nothing is sent)
    /// - [`IrrigatorError::CommandRejected`] if the device refused
    /// - any transport error from the device adapter
    pub async fn manual_command(&self, command: PumpCommand) -> Result<CommandAck, IrrigatorError> {
        let connected = self.lock_state().status.connected;
        if !connected {
            tracing::warn!(%command, "manual command refused: device not connected");
            self.post(Notification::error(DEVICE_NOT_CONNECTED, now()));
            return Err(IrrigatorError::NotConnected);
        }

        match self.controller.send_command(command).await {
            Ok(ack) if ack.success => {
                tracing::info!(%command, "manual command accepted");
                let message = match command {
                    PumpCommand::Activate => "Pump turned on manually",
                    PumpCommand::Deactivate => "Pump turned off manually",
                };
                self.post(Notification::manual(message, now()));
                Ok(ack)
            }
            Ok(ack) => {
                let message = ack
                    .message
                    .unwrap_or_else(|| "command rejected by device".to_string());
                tracing::warn!(%command, %message, "manual command rejected");
                self.post(Notification::error(message.clone(), now()));
                Err(IrrigatorError::CommandRejected(message))
            }
            Err(err) => {
                tracing::error!(%command, error = %err, "manual command failed");
                let message = match command {
                    PumpCommand::Activate => "error turning the pump on",
                    PumpCommand::Deactivate => "error turning the pump off",
                };
                self.post(Notification::error(message, now()));
                Err(err)
            }
        }
    }

    /// Flip the automation on or off and return the new state.
    pub fn toggle_automation(&self) -> bool {
        let enabled = self.lock_state().automation.toggle();
        self.announce_automation(enabled);
        enabled
    }

    /// Enable or disable the automation and return the new state.
    pub fn set_automation_enabled(&self, enabled: bool) -> bool {
        self.lock_state().automation.enabled = enabled;
        self.announce_automation(enabled);
        enabled
    }

    /// Current state as of now.
    #[must_use]
    pub fn snapshot(&self) -> ControllerSnapshot {
        self.snapshot_at(now())
    }

    /// Current state with notifications filtered as of `now`.
    #[must_use]
    pub fn snapshot_at(&self, now: Timestamp) -> ControllerSnapshot {
        let state = self.lock_state();
        ControllerSnapshot {
            status: state.status.clone(),
            automation: state.automation.clone(),
            notifications: state.board.visible(now),
            last_poll_at: state.last_poll_at,
        }
    }

    fn announce_automation(&self, enabled: bool) {
        let word = if enabled { "enabled" } else { "disabled" };
        tracing::info!(enabled, "automation {word}");
        self.post(Notification::manual(format!("Automation {word}"), now()));
    }

    fn post(&self, notification: Notification) {
        self.lock_state().board.post(notification);
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
