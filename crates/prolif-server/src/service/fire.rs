//! Clock-fire handling for scheduled and polling triggers.

use prolif_postgres::PgConnection;
use prolif_postgres::model::{NewTriggerEvent, UpdateTriggerEvent};
use prolif_postgres::query::{AutomationRepository, TriggerEventRepository, TriggerRepository};
use prolif_postgres::types::TriggerEventStatus;
use prolif_trigger::{ProviderEvent, ProviderRegistry};
use uuid::Uuid;

use crate::service::runs::RunLauncher;
use crate::Result;

/// Tracing target for trigger fires.
const TRACING_TARGET: &str = "prolif_server::service::fire";

/// What a fire amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A run was created.
    Launched,
    /// The fire was recorded as a skipped event.
    Skipped,
    /// The dedup boundary already held this fire (worker restart replay).
    Deduped,
    /// The trigger no longer exists or is no longer repeatable.
    Dropped,
}

/// Turns queue fire jobs into trigger events and runs.
#[derive(Clone)]
pub struct TriggerFireService {
    registry: ProviderRegistry,
    launcher: RunLauncher,
}

impl TriggerFireService {
    /// Creates a fire service.
    pub fn new(registry: ProviderRegistry, launcher: RunLauncher) -> Self {
        Self { registry, launcher }
    }

    /// Handles one fire of a trigger.
    ///
    /// Idempotent across restarts: the dedup key is derived from the
    /// scheduled fire instant, so a redelivered fire creates nothing new.
    #[tracing::instrument(skip_all, fields(trigger_id = %trigger_id, fired_at = %fired_at))]
    pub async fn fire(
        &self,
        conn: &mut PgConnection,
        trigger_id: Uuid,
        fired_at: jiff::Timestamp,
    ) -> Result<FireOutcome> {
        let Some(trigger) = conn.find_trigger_by_id(trigger_id).await? else {
            tracing::debug!(target: TRACING_TARGET, "Trigger gone; dropping fire");
            return Ok(FireOutcome::Dropped);
        };

        if !trigger.needs_schedule() {
            tracing::debug!(
                target: TRACING_TARGET,
                enabled = trigger.enabled,
                trigger_type = %trigger.trigger_type,
                "Trigger no longer repeatable; dropping fire"
            );
            return Ok(FireOutcome::Dropped);
        }

        let dedup_key = format!("scheduled:{}:{}", trigger.id, fired_at.as_second());

        if conn
            .find_trigger_event_by_dedup(trigger.id, &dedup_key)
            .await?
            .is_some()
        {
            tracing::debug!(target: TRACING_TARGET, dedup_key = %dedup_key, "Fire already recorded");
            return Ok(FireOutcome::Deduped);
        }

        let fire_event = ProviderEvent::anonymous(
            format!("{}.fire", trigger.provider),
            serde_json::json!({ "firedAt": fired_at.to_string() }),
        );

        let context = self
            .registry
            .get(&trigger.provider)
            .map(|provider| provider.context(&fire_event, &trigger.config))
            .unwrap_or_else(|| fire_event.payload.clone());

        let automation = conn.find_automation_by_id(trigger.automation_id).await?;
        let automation = match automation {
            Some(automation) if automation.enabled => automation,
            _ => {
                return self
                    .record_skip(conn, &trigger.id, &trigger, fire_event, dedup_key, "automation_disabled")
                    .await;
            }
        };

        let inserted = conn
            .create_trigger_event(NewTriggerEvent {
                trigger_id: trigger.id,
                organization_id: trigger.organization_id,
                external_event_id: None,
                provider_event_type: fire_event.event_type.clone(),
                raw_payload: fire_event.payload.clone(),
                parsed_context: context.clone(),
                dedup_key: Some(dedup_key.clone()),
                status: TriggerEventStatus::Processing,
                skip_reason: None,
            })
            .await;

        let trigger_event = match inserted {
            Ok(trigger_event) => trigger_event,
            Err(err) if err.is_unique_violation() => {
                return Ok(FireOutcome::Deduped);
            }
            Err(err) => return Err(err.into()),
        };

        match self
            .launcher
            .launch(conn, &automation, Some(trigger_event.id), context)
            .await
        {
            Ok((_, session_id)) => {
                conn.complete_trigger_event(trigger_event.id, session_id)
                    .await?;
                Ok(FireOutcome::Launched)
            }
            Err(error) => {
                // A failed fire is observable and final; it must not spin
                // through the queue's retry budget.
                conn.update_trigger_event(
                    trigger_event.id,
                    UpdateTriggerEvent {
                        status: Some(TriggerEventStatus::Skipped),
                        skip_reason: Some(Some("run_create_failed".to_owned())),
                        ..Default::default()
                    },
                )
                .await?;

                tracing::warn!(
                    target: TRACING_TARGET,
                    error = ?error,
                    "Fire could not create a run; recorded as skipped"
                );
                Ok(FireOutcome::Skipped)
            }
        }
    }

    async fn record_skip(
        &self,
        conn: &mut PgConnection,
        trigger_id: &Uuid,
        trigger: &prolif_postgres::model::Trigger,
        fire_event: ProviderEvent,
        dedup_key: String,
        reason: &str,
    ) -> Result<FireOutcome> {
        let inserted = conn
            .create_trigger_event(NewTriggerEvent {
                trigger_id: *trigger_id,
                organization_id: trigger.organization_id,
                external_event_id: None,
                provider_event_type: fire_event.event_type,
                raw_payload: fire_event.payload,
                parsed_context: serde_json::Value::Null,
                dedup_key: Some(dedup_key),
                status: TriggerEventStatus::Skipped,
                skip_reason: Some(reason.to_owned()),
            })
            .await;

        match inserted {
            Ok(_) => Ok(FireOutcome::Skipped),
            Err(err) if err.is_unique_violation() => Ok(FireOutcome::Deduped),
            Err(err) => Err(err.into()),
        }
    }
}

impl std::fmt::Debug for TriggerFireService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerFireService").finish_non_exhaustive()
    }
}
