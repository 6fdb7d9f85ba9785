//! The trigger scheduler: one repeatable registration per enabled
//! scheduled or polling trigger.
//!
//! Registrations are keyed by the stable job id
//! `scheduled-trigger-<triggerId>`, so re-registering after a restart is
//! idempotent. Each fire publishes a `FireTrigger` job whose dedup id is
//! derived from the scheduled fire instant; the queue's duplicate window
//! and the database dedup key together give at-most-once semantics per
//! fire.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::queue::{Job, JobKind, JobQueue};
use crate::{Error, Result, TRACING_TARGET_SCHEDULE};

/// Idle sleep when no registrations exist.
const IDLE_WAIT: Duration = Duration::from_secs(60);

/// A live schedule registration.
#[derive(Debug, Clone)]
pub struct ScheduleRegistration {
    pub trigger_id: Uuid,
    /// Stable registration key, persisted on the trigger row.
    pub job_id: String,
    pub expression: String,
}

#[derive(Debug, Clone)]
struct Entry {
    trigger_id: Uuid,
    schedule: Schedule,
}

/// In-process scheduler publishing trigger fires onto the job queue.
///
/// Cheaply cloneable; all clones share one registration table.
#[derive(Clone)]
pub struct TriggerScheduler {
    queue: JobQueue,
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    changed: Arc<Notify>,
}

impl TriggerScheduler {
    /// Creates a scheduler publishing onto `queue`.
    pub fn new(queue: JobQueue) -> Self {
        Self {
            queue,
            entries: Arc::new(Mutex::new(HashMap::new())),
            changed: Arc::new(Notify::new()),
        }
    }

    /// Returns the stable registration key for a trigger.
    pub fn job_id_for(trigger_id: Uuid) -> String {
        format!("scheduled-trigger-{trigger_id}")
    }

    /// Registers (or replaces) the repeatable job for a trigger.
    ///
    /// Returns the registration key to persist as the trigger's
    /// `repeat_job_key`.
    pub fn register(
        &self,
        trigger_id: Uuid,
        expression: &str,
    ) -> Result<ScheduleRegistration> {
        let normalized = normalize_expression(expression);
        let schedule = Schedule::from_str(&normalized)
            .map_err(|e| Error::invalid_cron(expression, e.to_string()))?;

        let job_id = Self::job_id_for(trigger_id);

        {
            let mut entries = self.entries.lock().expect("scheduler lock poisoned");
            entries.insert(
                job_id.clone(),
                Entry {
                    trigger_id,
                    schedule,
                },
            );
        }
        self.changed.notify_waiters();

        tracing::info!(
            target: TRACING_TARGET_SCHEDULE,
            trigger_id = %trigger_id,
            job_id = %job_id,
            expression = %normalized,
            "Registered repeatable trigger job"
        );

        Ok(ScheduleRegistration {
            trigger_id,
            job_id,
            expression: normalized,
        })
    }

    /// Removes a registration by its key. Returns whether one existed.
    pub fn remove(&self, job_id: &str) -> bool {
        let removed = {
            let mut entries = self.entries.lock().expect("scheduler lock poisoned");
            entries.remove(job_id).is_some()
        };

        if removed {
            self.changed.notify_waiters();
            tracing::info!(
                target: TRACING_TARGET_SCHEDULE,
                job_id = %job_id,
                "Removed repeatable trigger job"
            );
        }

        removed
    }

    /// Returns the number of live registrations.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("scheduler lock poisoned").len()
    }

    /// Returns whether no registrations exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs the fire loop until cancelled.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(target: TRACING_TARGET_SCHEDULE, "Starting trigger scheduler");

        loop {
            let now = Utc::now();
            let next = self.next_fire(now);

            let wait = match &next {
                Some((instant, _)) => (*instant - now).to_std().unwrap_or(Duration::ZERO),
                None => IDLE_WAIT,
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(
                        target: TRACING_TARGET_SCHEDULE,
                        "Trigger scheduler shutdown requested"
                    );
                    break;
                }
                _ = self.changed.notified() => {
                    // Registrations changed; recompute the nearest fire.
                    continue;
                }
                _ = tokio::time::sleep(wait) => {
                    if let Some((instant, due)) = next {
                        self.publish_fires(instant, &due).await;
                    }
                }
            }
        }

        Ok(())
    }

    /// Computes the nearest upcoming fire and every trigger due at it.
    fn next_fire(&self, after: DateTime<Utc>) -> Option<(DateTime<Utc>, Vec<Uuid>)> {
        let entries = self.entries.lock().expect("scheduler lock poisoned");

        let mut nearest: Option<DateTime<Utc>> = None;
        let mut due = Vec::new();

        for entry in entries.values() {
            let Some(next) = entry.schedule.after(&after).next() else {
                continue;
            };

            match nearest {
                Some(current) if next > current => {}
                Some(current) if next == current => due.push(entry.trigger_id),
                _ => {
                    nearest = Some(next);
                    due.clear();
                    due.push(entry.trigger_id);
                }
            }
        }

        nearest.map(|instant| (instant, due))
    }

    /// Publishes one fire job per due trigger.
    async fn publish_fires(&self, instant: DateTime<Utc>, due: &[Uuid]) {
        let fired_at = jiff::Timestamp::from_second(instant.timestamp())
            .unwrap_or_else(|_| jiff::Timestamp::now());

        for &trigger_id in due {
            let job = Job::new(JobKind::FireTrigger {
                trigger_id,
                fired_at,
            });

            if let Err(err) = self.queue.submit(&job).await {
                tracing::error!(
                    target: TRACING_TARGET_SCHEDULE,
                    trigger_id = %trigger_id,
                    error = %err,
                    "Failed to publish trigger fire"
                );
            } else {
                tracing::debug!(
                    target: TRACING_TARGET_SCHEDULE,
                    trigger_id = %trigger_id,
                    fired_at = %fired_at,
                    "Published trigger fire"
                );
            }
        }
    }
}

impl std::fmt::Debug for TriggerScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerScheduler")
            .field("registrations", &self.len())
            .finish_non_exhaustive()
    }
}

/// Accepts the common 5-field cron form by prepending a seconds field.
fn normalize_expression(expression: &str) -> String {
    let trimmed = expression.trim();
    if trimmed.split_whitespace().count() == 5 {
        format!("0 {trimmed}")
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_scheduler() -> TriggerScheduler {
        TriggerScheduler::new(JobQueue::test_stub())
    }

    #[test]
    fn five_field_expressions_are_normalized() {
        assert_eq!(normalize_expression("*/5 * * * *"), "0 */5 * * * *");
        assert_eq!(normalize_expression("0 0 * * * *"), "0 0 * * * *");
    }

    #[test]
    fn register_is_idempotent_per_trigger() {
        let scheduler = test_scheduler();
        let trigger_id = Uuid::new_v4();

        let first = scheduler.register(trigger_id, "0 * * * * *").unwrap();
        let second = scheduler.register(trigger_id, "*/30 * * * *").unwrap();

        assert_eq!(first.job_id, second.job_id);
        assert_eq!(first.job_id, TriggerScheduler::job_id_for(trigger_id));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn invalid_cron_is_rejected() {
        let scheduler = test_scheduler();
        assert!(scheduler.register(Uuid::new_v4(), "not a cron").is_err());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn remove_clears_registration() {
        let scheduler = test_scheduler();
        let registration = scheduler.register(Uuid::new_v4(), "0 0 * * * *").unwrap();

        assert!(scheduler.remove(&registration.job_id));
        assert!(!scheduler.remove(&registration.job_id));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn next_fire_picks_nearest_entry() {
        let scheduler = test_scheduler();
        let hourly = Uuid::new_v4();
        let every_minute = Uuid::new_v4();

        scheduler.register(hourly, "0 0 * * * *").unwrap();
        scheduler.register(every_minute, "0 * * * * *").unwrap();

        let now = Utc::now();
        let (instant, due) = scheduler.next_fire(now).unwrap();
        assert!(instant > now);
        assert!(due.contains(&every_minute));
    }
}
