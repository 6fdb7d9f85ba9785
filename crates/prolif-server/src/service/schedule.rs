//! Keeps scheduler registrations aligned with trigger rows.
//!
//! Invariant: every enabled scheduled or polling trigger has a live
//! registration whose key is stored in `repeat_job_key`; a disabled or
//! deleted trigger has neither.

use prolif_nats::TriggerScheduler;
use prolif_postgres::PgConnection;
use prolif_postgres::model::Trigger;
use prolif_postgres::query::TriggerRepository;

use crate::{Error, Result};

/// Tracing target for schedule synchronization.
const TRACING_TARGET: &str = "prolif_server::service::schedule";

/// Scheduler registration sync service.
#[derive(Debug, Clone)]
pub struct ScheduleSync {
    scheduler: TriggerScheduler,
}

impl ScheduleSync {
    /// Creates a sync service over the scheduler.
    pub fn new(scheduler: TriggerScheduler) -> Self {
        Self { scheduler }
    }

    /// Aligns one trigger's registration with its row state, persisting
    /// the registration key.
    pub async fn sync_trigger(
        &self,
        conn: &mut PgConnection,
        trigger: &Trigger,
    ) -> Result<Option<String>> {
        if trigger.needs_schedule() {
            let Some(expression) = trigger.cron_expression() else {
                return Err(Error::config(format!(
                    "trigger {} is repeatable but carries no cron expression",
                    trigger.id
                )));
            };

            let registration = self.scheduler.register(trigger.id, expression)?;
            conn.set_trigger_repeat_key(trigger.id, Some(registration.job_id.clone()))
                .await?;

            Ok(Some(registration.job_id))
        } else {
            self.remove_trigger(conn, trigger).await?;
            Ok(None)
        }
    }

    /// Removes a trigger's registration using its stored key.
    pub async fn remove_trigger(
        &self,
        conn: &mut PgConnection,
        trigger: &Trigger,
    ) -> Result<()> {
        let job_id = trigger
            .repeat_job_key
            .clone()
            .unwrap_or_else(|| trigger.schedule_job_id());

        self.scheduler.remove(&job_id);

        if trigger.repeat_job_key.is_some() {
            conn.set_trigger_repeat_key(trigger.id, None).await?;
        }

        Ok(())
    }

    /// Drops a registration without touching the (already deleted) row.
    pub fn forget_trigger(&self, trigger: &Trigger) {
        let job_id = trigger
            .repeat_job_key
            .clone()
            .unwrap_or_else(|| trigger.schedule_job_id());
        self.scheduler.remove(&job_id);
    }

    /// Re-registers every enabled repeatable trigger at process start.
    ///
    /// Idempotent: registration keys are stable per trigger, so a restart
    /// replaces rather than duplicates.
    pub async fn restore(&self, conn: &mut PgConnection) -> Result<usize> {
        let triggers = conn.list_enabled_repeatable_triggers().await?;
        let mut restored = 0;

        for trigger in &triggers {
            match self.sync_trigger(conn, trigger).await {
                Ok(_) => restored += 1,
                Err(err) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        trigger_id = %trigger.id,
                        error = %err,
                        "Failed to restore schedule registration"
                    );
                }
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            restored = restored,
            total = triggers.len(),
            "Restored schedule registrations"
        );

        Ok(restored)
    }
}
