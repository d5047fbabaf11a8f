//! Notifications: short-lived messages shown to whoever watches the controller.
//!
//! Automation and manual-control messages are transient and stack up; error
//! messages go to a single banner that is replaced by the next error and
//! cleared once the device reports connected again.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

use crate::time::{Timestamp, duration_ms};

/// How long automation/manual messages stay visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(4);
/// How long the error banner stays visible.
pub const ERROR_TTL: Duration = Duration::from_secs(5);
/// Default number of transient messages kept on a [`NotificationBoard`].
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Emitted when the automation switched the pump.
    Automation,
    /// Emitted for manual commands and automation toggles.
    Manual,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: Timestamp,
    #[serde(with = "duration_ms")]
    pub ttl: Duration,
}

impl Notification {
    #[must_use]
    pub fn automation(message: impl Into<String>, now: Timestamp) -> Self {
        Self::new(NotificationKind::Automation, message, now, MESSAGE_TTL)
    }

    #[must_use]
    pub fn manual(message: impl Into<String>, now: Timestamp) -> Self {
        Self::new(NotificationKind::Manual, message, now, MESSAGE_TTL)
    }

    #[must_use]
    pub fn error(message: impl Into<String>, now: Timestamp) -> Self {
        Self::new(NotificationKind::Error, message, now, ERROR_TTL)
    }

    fn new(
        kind: NotificationKind,
        message: impl Into<String>,
        now: Timestamp,
        ttl: Duration,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            created_at: now,
            ttl,
        }
    }

    /// Whether the notification is still showing at `now`.
    #[must_use]
    pub fn is_visible(&self, now: Timestamp) -> bool {
        match now.signed_duration_since(self.created_at).to_std() {
            Ok(age) => age < self.ttl,
            // Created "in the future" relative to `now`: still fresh.
            Err(_) => true,
        }
    }
}

/// Recent notifications plus the current error banner.
#[derive(Debug, Clone)]
pub struct NotificationBoard {
    banner: Option<Notification>,
    messages: VecDeque<Notification>,
    capacity: usize,
}

impl Default for NotificationBoard {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationBoard {
    /// Create a board keeping at most `capacity` transient messages.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            banner: None,
            messages: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Post a notification. Errors replace the banner; everything else is
    /// appended, evicting the oldest message when full.
    pub fn post(&mut self, notification: Notification) {
        if notification.kind == NotificationKind::Error {
            self.banner = Some(notification);
            return;
        }
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(notification);
    }

    /// Hide the error banner immediately.
    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// The banner if it is still showing at `now`.
    #[must_use]
    pub fn banner(&self, now: Timestamp) -> Option<&Notification> {
        self.banner.as_ref().filter(|n| n.is_visible(now))
    }

    /// Drop everything that has expired at `now`.
    pub fn prune(&mut self, now: Timestamp) {
        if self.banner.as_ref().is_some_and(|n| !n.is_visible(now)) {
            self.banner = None;
        }
        self.messages.retain(|n| n.is_visible(now));
    }

    /// Everything showing at `now`: banner first, then messages oldest first.
    #[must_use]
    pub fn visible(&self, now: Timestamp) -> Vec<Notification> {
        self.banner(now)
            .into_iter()
            .chain(self.messages.iter().filter(|n| n.is_visible(now)))
            .cloned()
            .collect()
    }
}
