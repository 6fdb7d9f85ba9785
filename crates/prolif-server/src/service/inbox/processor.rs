//! The inbox worker's processing core.
//!
//! Drains one `webhook_inbox` row into semantic trigger events and spawns
//! runs, with exactly-once downstream effects per `(trigger_id,
//! dedup_key)`. The optimistic claim is the reprocess guard; the unique
//! constraint is the dedup boundary; everything in between is observable
//! as `skipped` events rather than silent drops.

use std::collections::BTreeMap;
use std::str::FromStr;

use bytes::Bytes;
use prolif_postgres::model::{Automation, NewTriggerEvent, Trigger, WebhookInbox};
use prolif_postgres::query::{
    AutomationRepository, IntegrationRepository, TriggerEventRepository, TriggerRepository,
    WebhookInboxRepository,
};
use prolif_postgres::types::TriggerEventStatus;
use prolif_postgres::PgConnection;
use prolif_trigger::{ProviderEvent, ProviderRegistry, TriggerProvider, WebhookDelivery};
use uuid::Uuid;

use crate::service::runs::RunLauncher;
use crate::service::sessions::SessionError;
use crate::{Error, Result};

/// Tracing target for inbox processing.
const TRACING_TARGET: &str = "prolif_server::service::inbox";

/// Marker key ingress stores when a body was not valid JSON.
///
/// Such rows fail exactly once; re-parsing cannot succeed, so they never
/// enter the retry loop.
pub const MALFORMED_PAYLOAD_KEY: &str = "__malformed";

/// Per-row processing tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InboxOutcome {
    /// Events that created a run.
    pub launched: usize,
    /// Events recorded as skipped (filter, disabled automation, ...).
    pub skipped: usize,
    /// Events dropped by the dedup boundary.
    pub deduped: usize,
    /// Events whose run creation failed.
    pub failed: usize,
}

impl InboxOutcome {
    fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// The inbox processing core shared by all worker tasks.
#[derive(Clone)]
pub struct InboxProcessor {
    registry: ProviderRegistry,
    launcher: RunLauncher,
}

impl InboxProcessor {
    /// Creates a processor over the provider registry and run launcher.
    pub fn new(registry: ProviderRegistry, launcher: RunLauncher) -> Self {
        Self { registry, launcher }
    }

    /// Processes one inbox row to a terminal state.
    ///
    /// Returns `Ok` when the row reached `completed` (including the
    /// zero-trigger and all-skipped cases); `Err` when an infrastructure
    /// failure should send the row back through the queue's retry budget.
    #[tracing::instrument(skip_all, fields(inbox_id = %inbox_id))]
    pub async fn process(
        &self,
        conn: &mut PgConnection,
        inbox_id: Uuid,
    ) -> Result<InboxOutcome> {
        // Idempotent reprocess guard: first worker wins the claim.
        let Some(row) = conn.claim_inbox_row(inbox_id).await? else {
            tracing::debug!(
                target: TRACING_TARGET,
                "Inbox row missing or already claimed; skipping"
            );
            return Ok(InboxOutcome::default());
        };

        if row.payload.get(MALFORMED_PAYLOAD_KEY).is_some() {
            conn.fail_inbox_row(inbox_id, "payload is not valid JSON")
                .await?;
            tracing::warn!(target: TRACING_TARGET, "Malformed payload; failed once");
            return Ok(InboxOutcome::default());
        }

        match self.process_claimed(conn, &row).await {
            Ok(outcome) => {
                if outcome.is_clean() {
                    conn.complete_inbox_row(inbox_id).await?;
                } else {
                    conn.fail_inbox_row(inbox_id, "one or more events failed to launch")
                        .await?;
                }

                tracing::info!(
                    target: TRACING_TARGET,
                    launched = outcome.launched,
                    skipped = outcome.skipped,
                    deduped = outcome.deduped,
                    failed = outcome.failed,
                    "Inbox row processed"
                );
                Ok(outcome)
            }
            Err(error) => {
                // Retryable errors hand the row back to the queue: the
                // redelivered job must find it pending or the claim guard
                // would no-op the retry.
                if error.is_retryable() {
                    conn.requeue_inbox_row(inbox_id, &error.to_string()).await?;
                } else {
                    conn.fail_inbox_row(inbox_id, &error.to_string()).await?;
                }
                Err(error)
            }
        }
    }

    /// Routes a claimed row and processes every matched trigger.
    async fn process_claimed(
        &self,
        conn: &mut PgConnection,
        row: &WebhookInbox,
    ) -> Result<InboxOutcome> {
        let Some(provider) = self.registry.get(&row.provider).cloned() else {
            tracing::warn!(
                target: TRACING_TARGET,
                provider = %row.provider,
                "Unknown provider on inbox row; completing with no effect"
            );
            return Ok(InboxOutcome::default());
        };

        let delivery = delivery_from_row(row);
        let triggers = self.resolve_triggers(conn, &*provider, row, &delivery).await?;

        if triggers.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET,
                provider = %row.provider,
                "No matching triggers for delivery"
            );
            return Ok(InboxOutcome::default());
        }

        let events = provider.events(&delivery);
        let mut outcome = InboxOutcome::default();

        for trigger in &triggers {
            for event in &events {
                self.process_event(conn, &*provider, trigger, event, &mut outcome)
                    .await?;
            }
        }

        Ok(outcome)
    }

    /// Resolves the triggers a delivery routes to.
    async fn resolve_triggers(
        &self,
        conn: &mut PgConnection,
        provider: &dyn TriggerProvider,
        row: &WebhookInbox,
        delivery: &WebhookDelivery,
    ) -> Result<Vec<Trigger>> {
        match row.provider.as_str() {
            // Trigger-addressed: the URL named the trigger directly.
            "custom" => {
                let Some(trigger) = self.find_addressed_trigger(conn, row).await? else {
                    return Ok(Vec::new());
                };

                // Deferred signature verification with the trigger's secret.
                let secret = trigger
                    .config
                    .get("secret")
                    .and_then(|v| v.as_str())
                    .map(str::to_owned);
                if let Err(err) = provider.verify(delivery, secret.as_deref()) {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        trigger_id = %trigger.id,
                        error = %err,
                        "Deferred signature verification failed"
                    );
                    self.record_skip(conn, &trigger, None, "signature_mismatch", delivery)
                        .await?;
                    return Ok(Vec::new());
                }

                Ok(vec![trigger])
            }

            // Automation-addressed: the URL named the automation.
            "posthog" | "automation" => {
                let Some(automation_id) = parse_external_id(row) else {
                    return Ok(Vec::new());
                };
                Ok(conn
                    .list_automation_webhook_triggers(automation_id, &row.provider)
                    .await?)
            }

            // Connection-routed: derive the connection id from the payload.
            _ => {
                let Some(connection_id) = provider.connection_id(delivery) else {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        provider = %row.provider,
                        "Delivery carries no connection id"
                    );
                    return Ok(Vec::new());
                };

                let Some(integration) = conn
                    .find_integration_by_connection(&row.provider, &connection_id)
                    .await?
                else {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        provider = %row.provider,
                        connection_id = %connection_id,
                        "Unknown connection; completing with no effect"
                    );
                    return Ok(Vec::new());
                };

                if !integration.is_active() {
                    return Ok(Vec::new());
                }

                Ok(conn.list_active_webhook_triggers(integration.id).await?)
            }
        }
    }

    /// Processes one `(trigger, event)` pair.
    async fn process_event(
        &self,
        conn: &mut PgConnection,
        provider: &dyn TriggerProvider,
        trigger: &Trigger,
        event: &ProviderEvent,
        outcome: &mut InboxOutcome,
    ) -> Result<()> {
        let dedup_key = provider.idempotency_key(event);

        // Cheap pre-check; the unique constraint remains the contract.
        if let Some(key) = dedup_key.as_deref()
            && conn
                .find_trigger_event_by_dedup(trigger.id, key)
                .await?
                .is_some()
        {
            outcome.deduped += 1;
            return Ok(());
        }

        // A config that no longer validates cannot be matched against.
        let config = match provider.config_schema().safe_parse(&trigger.config) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    trigger_id = %trigger.id,
                    error = %err,
                    "Trigger config failed validation"
                );
                if self
                    .insert_skipped(conn, trigger, event, dedup_key, "config_invalid")
                    .await?
                {
                    outcome.skipped += 1;
                } else {
                    outcome.deduped += 1;
                }
                return Ok(());
            }
        };

        if !provider.filter(event, &config) {
            if self
                .insert_skipped(conn, trigger, event, dedup_key, "filter_mismatch")
                .await?
            {
                outcome.skipped += 1;
            } else {
                outcome.deduped += 1;
            }
            return Ok(());
        }

        let automation = conn.find_automation_by_id(trigger.automation_id).await?;
        let automation = match automation {
            Some(automation) if automation.enabled => automation,
            _ => {
                if self
                    .insert_skipped(conn, trigger, event, dedup_key, "automation_disabled")
                    .await?
                {
                    outcome.skipped += 1;
                } else {
                    outcome.deduped += 1;
                }
                return Ok(());
            }
        };

        let context = provider.context(event, &config);
        self.launch_event(
            conn, trigger, &automation, event, dedup_key, context, outcome,
        )
        .await
    }

    /// Creates the processing event and launches its run.
    #[allow(clippy::too_many_arguments)]
    async fn launch_event(
        &self,
        conn: &mut PgConnection,
        trigger: &Trigger,
        automation: &Automation,
        event: &ProviderEvent,
        dedup_key: Option<String>,
        context: serde_json::Value,
        outcome: &mut InboxOutcome,
    ) -> Result<()> {
        let inserted = conn
            .create_trigger_event(NewTriggerEvent {
                trigger_id: trigger.id,
                organization_id: trigger.organization_id,
                external_event_id: event.external_event_id.clone(),
                provider_event_type: event.event_type.clone(),
                raw_payload: event.payload.clone(),
                parsed_context: context.clone(),
                dedup_key,
                status: TriggerEventStatus::Processing,
                skip_reason: None,
            })
            .await;

        let trigger_event = match inserted {
            Ok(trigger_event) => trigger_event,
            Err(err) if err.is_unique_violation() => {
                // Lost the insert race; the other worker owns this event.
                outcome.deduped += 1;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        match self
            .launcher
            .launch(conn, automation, Some(trigger_event.id), context)
            .await
        {
            Ok((_, session_id)) => {
                conn.complete_trigger_event(trigger_event.id, session_id)
                    .await?;
                outcome.launched += 1;
                Ok(())
            }
            Err(error) => {
                let message = match &error {
                    SessionError::Gate(deny) => format!("gate denied: {}", deny.code.as_str()),
                    other => format!("{other:?}"),
                };
                conn.fail_trigger_event(trigger_event.id, &message).await?;
                outcome.failed += 1;

                // Infrastructure failures propagate for queue retry; gate
                // denials are final for this fire.
                match error {
                    SessionError::Gate(_) => Ok(()),
                    SessionError::Gateway(err) => Err(Error::Capability(err)),
                    SessionError::Database(err) => Err(Error::Postgres(err)),
                    SessionError::NotFound | SessionError::InvalidState { .. } => Ok(()),
                }
            }
        }
    }

    /// Inserts a skipped event; returns false when dedup suppressed it.
    async fn insert_skipped(
        &self,
        conn: &mut PgConnection,
        trigger: &Trigger,
        event: &ProviderEvent,
        dedup_key: Option<String>,
        reason: &str,
    ) -> Result<bool> {
        let inserted = conn
            .create_trigger_event(NewTriggerEvent {
                trigger_id: trigger.id,
                organization_id: trigger.organization_id,
                external_event_id: event.external_event_id.clone(),
                provider_event_type: event.event_type.clone(),
                raw_payload: event.payload.clone(),
                parsed_context: serde_json::Value::Null,
                dedup_key,
                status: TriggerEventStatus::Skipped,
                skip_reason: Some(reason.to_owned()),
            })
            .await;

        match inserted {
            Ok(_) => Ok(true),
            Err(err) if err.is_unique_violation() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Records a skip for a trigger with a synthesized anonymous event.
    async fn record_skip(
        &self,
        conn: &mut PgConnection,
        trigger: &Trigger,
        dedup_key: Option<String>,
        reason: &str,
        delivery: &WebhookDelivery,
    ) -> Result<()> {
        let event = ProviderEvent::anonymous("delivery", delivery.payload.clone());
        self.insert_skipped(conn, trigger, &event, dedup_key, reason)
            .await?;
        Ok(())
    }

    /// Loads a trigger addressed directly by the route.
    async fn find_addressed_trigger(
        &self,
        conn: &mut PgConnection,
        row: &WebhookInbox,
    ) -> Result<Option<Trigger>> {
        let Some(trigger_id) = parse_external_id(row) else {
            return Ok(None);
        };

        let trigger = conn.find_trigger_by_id(trigger_id).await?;
        Ok(trigger.filter(|t| t.enabled))
    }
}

/// Rebuilds the delivery view from a persisted inbox row.
fn delivery_from_row(row: &WebhookInbox) -> WebhookDelivery {
    let headers: BTreeMap<String, String> = row
        .headers
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_owned())))
                .collect()
        })
        .unwrap_or_default();

    let body = Bytes::from(serde_json::to_vec(&row.payload).unwrap_or_default());

    WebhookDelivery {
        headers,
        body,
        payload: row.payload.clone(),
    }
}

fn parse_external_id(row: &WebhookInbox) -> Option<Uuid> {
    row.external_id
        .as_deref()
        .and_then(|id| Uuid::from_str(id).ok())
}

impl std::fmt::Debug for InboxProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboxProcessor").finish_non_exhaustive()
    }
}
