//! Background worker fleet.
//!
//! One worker process runs: the job consumer (inbox drain, trigger fires,
//! snapshot builds, inbox sweeps), the trigger scheduler, the inbox GC
//! ticker, and the session-event wake subscriber. All of them stop on the
//! shared cancellation token.

mod gc;
mod jobs;
mod wake;

pub use gc::GcTicker;
pub use jobs::JobWorker;
pub use wake::SessionSubscriber;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::service::ServiceState;
use crate::Result;

/// Tracing target for worker lifecycle.
const TRACING_TARGET: &str = "prolif_server::worker";

/// Spawns the full worker fleet.
///
/// Re-registers scheduler entries from the database first, so enabled
/// repeatable triggers fire after a restart without any write.
pub async fn spawn_workers(
    state: ServiceState,
    cancel: CancellationToken,
) -> Result<Vec<JoinHandle<Result<()>>>> {
    let mut conn = state.pg_client().get_connection().await?;
    state.schedule_sync().restore(&mut conn).await?;
    drop(conn);

    let mut handles = Vec::new();

    let job_worker = JobWorker::new(state.clone());
    let job_cancel = cancel.clone();
    handles.push(tokio::spawn(async move { job_worker.run(job_cancel).await }));

    let scheduler = state.scheduler().clone();
    let scheduler_cancel = cancel.clone();
    handles.push(tokio::spawn(async move {
        scheduler.run(scheduler_cancel).await.map_err(Into::into)
    }));

    let subscriber = SessionSubscriber::new(state.clone());
    let subscriber_cancel = cancel.clone();
    handles.push(tokio::spawn(async move {
        subscriber.run(subscriber_cancel).await
    }));

    let gc = GcTicker::new(state);
    handles.push(tokio::spawn(async move { gc.run(cancel).await }));

    tracing::info!(
        target: TRACING_TARGET,
        workers = handles.len(),
        "Worker fleet started"
    );

    Ok(handles)
}
