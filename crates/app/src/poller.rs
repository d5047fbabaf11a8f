//! Poller: ticks the irrigation service on a fixed period.
//!
//! Ticks run one after another inside a single task, so a slow device can
//! delay the next cycle but never overlap it. Missed ticks are skipped
//! rather than bunched up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ports::PumpController;
use crate::services::irrigation_service::IrrigationService;

/// Default period between two polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Handle to a running poll loop.
///
/// Dropping the handle also stops the loop.
pub struct PollerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the loop, cancelling any in-flight tick, and wait for the task
    /// to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(err) = self.task.await {
            tracing::error!(error = %err, "poller task ended abnormally");
        }
        tracing::info!("poller stopped");
    }
}

/// Spawn the poll loop on the current tokio runtime.
///
/// The first tick fires immediately.
pub fn spawn<C>(service: Arc<IrrigationService<C>>, period: Duration) -> PollerHandle
where
    C: PumpController + 'static,
{
    let (shutdown, mut stop) = oneshot::channel();
    let period = period.max(Duration::from_millis(1));

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = &mut stop => break,
                _ = async {
                    ticker.tick().await;
                    let outcome = service.tick().await;
                    tracing::trace!(?outcome, "poll tick done");
                } => {}
            }
        }
    });

    tracing::info!(period_ms = period.as_millis(), "poller started");
    PollerHandle { shutdown, task }
}
