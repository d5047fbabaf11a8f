//! Shared application state for axum handlers.

use std::sync::Arc;

use irrigator_app::ports::PumpController;
use irrigator_app::services::irrigation_service::IrrigationService;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the controller type itself does not
/// need to be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<C> {
    /// The irrigation service, shared with the poller.
    pub service: Arc<IrrigationService<C>>,
    /// Auto-refresh period of the status page, in seconds.
    pub refresh_seconds: u64,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            refresh_seconds: self.refresh_seconds,
        }
    }
}

impl<C> AppState<C>
where
    C: PumpController + 'static,
{
    /// Wrap an already-shared service.
    pub fn new(service: Arc<IrrigationService<C>>, refresh_seconds: u64) -> Self {
        Self {
            service,
            refresh_seconds: refresh_seconds.max(1),
        }
    }
}
