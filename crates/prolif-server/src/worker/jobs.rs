//! The job consumer: dispatches queued runtime jobs to their services.

use std::sync::Arc;
use std::time::Duration;

use prolif_nats::{JobKind, JobMessage};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::service::ServiceState;
use crate::{Error, Result};

/// Tracing target for the job worker.
const TRACING_TARGET: &str = "prolif_server::worker::jobs";

/// Durable consumer shared by every worker process.
const CONSUMER_NAME: &str = "runtime-worker";

/// Fetch wait per poll.
const FETCH_WAIT: Duration = Duration::from_secs(5);

/// Consumes runtime jobs with bounded concurrency.
pub struct JobWorker {
    state: ServiceState,
    semaphore: Arc<Semaphore>,
}

impl JobWorker {
    /// Creates a job worker with the configured concurrency cap.
    pub fn new(state: ServiceState) -> Self {
        let concurrency = state.runtime_config().worker_concurrency.max(1);
        Self {
            state,
            semaphore: Arc::new(Semaphore::new(concurrency)),
        }
    }

    /// Runs the consume loop until cancelled.
    ///
    /// Waits for in-flight jobs before returning, honoring the drain
    /// deadline handled by the caller.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(target: TRACING_TARGET, "Starting job worker");

        let consumer = self
            .state
            .job_queue()
            .create_consumer(CONSUMER_NAME)
            .await?;

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    tracing::info!(target: TRACING_TARGET, "Shutdown requested, stopping job worker");
                    break;
                }

                result = self.state.job_queue().next_job(&consumer, FETCH_WAIT) => {
                    match result {
                        Ok(Some(message)) => self.dispatch(message).await,
                        Ok(None) => {}
                        Err(err) => {
                            tracing::error!(
                                target: TRACING_TARGET,
                                error = %err,
                                "Failed to fetch job"
                            );
                            tokio::time::sleep(Duration::from_secs(1)).await;
                        }
                    }
                }
            }
        }

        // Drain: hold every permit, so all in-flight jobs have finished.
        let concurrency = self.state.runtime_config().worker_concurrency.max(1) as u32;
        let _ = self.semaphore.acquire_many(concurrency).await;

        tracing::info!(target: TRACING_TARGET, "Job worker stopped");
        Ok(())
    }

    /// Spawns the job on a task bounded by the semaphore.
    async fn dispatch(&self, message: JobMessage) {
        let permit = match self.semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return,
        };

        let state = self.state.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let job_id = message.job().id;
            let kind = message.job().kind.clone();
            let attempt = message.delivery_attempt().unwrap_or(1);

            tracing::info!(
                target: TRACING_TARGET,
                job_id = %job_id,
                kind = %kind,
                attempt = attempt,
                "Processing job"
            );

            match execute_job(&state, &kind).await {
                Ok(()) => {
                    if let Err(err) = message.ack().await {
                        tracing::error!(
                            target: TRACING_TARGET,
                            job_id = %job_id,
                            error = %err,
                            "Failed to ack job"
                        );
                    }
                }
                Err(error) if error.is_retryable() => {
                    // Linear backoff per attempt; max_deliver bounds it.
                    let delay = Duration::from_secs(10 * attempt);
                    tracing::warn!(
                        target: TRACING_TARGET,
                        job_id = %job_id,
                        error = %error,
                        delay = ?delay,
                        "Job failed, will retry"
                    );
                    if let Err(err) = message.nak(delay).await {
                        tracing::error!(
                            target: TRACING_TARGET,
                            job_id = %job_id,
                            error = %err,
                            "Failed to nak job"
                        );
                    }
                }
                Err(error) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        job_id = %job_id,
                        error = %error,
                        "Job failed permanently"
                    );
                    message.ack().await.ok();
                }
            }
        });
    }
}

/// Runs one job to completion.
async fn execute_job(state: &ServiceState, kind: &JobKind) -> Result<()> {
    let mut conn = state.pg_client().get_connection().await?;

    match kind {
        JobKind::ProcessInbox { inbox_id } => {
            state
                .inbox_processor()
                .process(&mut conn, *inbox_id)
                .await?;
        }
        JobKind::FireTrigger {
            trigger_id,
            fired_at,
        } => {
            state
                .fire_service()
                .fire(&mut conn, *trigger_id, *fired_at)
                .await?;
        }
        JobKind::BuildSnapshot {
            configuration_id,
            force,
        } => {
            state
                .snapshot_builder()
                .build(&mut conn, *configuration_id, *force)
                .await?;
        }
        JobKind::SweepInbox => {
            use prolif_postgres::query::WebhookInboxRepository;

            let retention = state.runtime_config().inbox_retention();
            let cutoff = jiff::Timestamp::now()
                - jiff::SignedDuration::try_from(retention)
                    .map_err(|e| Error::config(e.to_string()))?;

            let deleted = conn.delete_expired_inbox_rows(cutoff).await?;
            tracing::info!(
                target: TRACING_TARGET,
                deleted = deleted,
                "Swept expired inbox rows"
            );
        }
    }

    Ok(())
}

impl std::fmt::Debug for JobWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobWorker").finish_non_exhaustive()
    }
}
