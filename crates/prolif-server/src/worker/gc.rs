//! Inbox retention GC ticker.

use std::time::Duration;

use prolif_nats::{Job, JobKind};
use tokio_util::sync::CancellationToken;

use crate::service::ServiceState;
use crate::Result;

/// Tracing target for the GC ticker.
const TRACING_TARGET: &str = "prolif_server::worker::gc";

/// Sweep cadence.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Enqueues an hourly inbox sweep job.
///
/// The sweep itself runs through the job queue, so multiple processes
/// ticking concurrently just queue redundant, harmless deletes.
pub struct GcTicker {
    state: ServiceState,
}

impl GcTicker {
    /// Creates a GC ticker.
    pub fn new(state: ServiceState) -> Self {
        Self { state }
    }

    /// Runs until cancelled.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(
            target: TRACING_TARGET,
            interval = ?SWEEP_INTERVAL,
            retention_days = self.state.runtime_config().inbox_retention_days,
            "Starting inbox GC ticker"
        );

        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!(target: TRACING_TARGET, "Shutdown requested, stopping GC ticker");
                    break;
                }

                _ = interval.tick() => {
                    let job = Job::new(JobKind::SweepInbox);
                    if let Err(err) = self.state.job_queue().submit(&job).await {
                        tracing::error!(
                            target: TRACING_TARGET,
                            error = %err,
                            "Failed to enqueue inbox sweep"
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for GcTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcTicker").finish_non_exhaustive()
    }
}
