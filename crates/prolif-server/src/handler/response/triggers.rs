//! Trigger response types.

use jiff::Timestamp;
use prolif_postgres::model;
use prolif_postgres::types::{TriggerEventStatus, TriggerType};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered trigger.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    /// Unique trigger identifier.
    pub trigger_id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Automation this trigger fires.
    pub automation_id: Uuid,
    /// Provider id.
    pub provider: String,
    /// How this trigger produces events.
    pub trigger_type: TriggerType,
    /// Integration connection routed to this trigger.
    pub integration_id: Option<Uuid>,
    /// Provider-specific config.
    pub config: serde_json::Value,
    /// Whether the trigger is live.
    pub enabled: bool,
    /// Cron cadence for polling triggers.
    pub polling_cron: Option<String>,
    /// When the trigger was created.
    pub created_at: Timestamp,
    /// When the trigger was last modified.
    pub updated_at: Timestamp,
}

impl From<model::Trigger> for Trigger {
    fn from(trigger: model::Trigger) -> Self {
        Self {
            trigger_id: trigger.id,
            organization_id: trigger.organization_id,
            automation_id: trigger.automation_id,
            provider: trigger.provider,
            trigger_type: trigger.trigger_type,
            integration_id: trigger.integration_id,
            config: trigger.config,
            enabled: trigger.enabled,
            polling_cron: trigger.polling_cron,
            created_at: trigger.created_at.into(),
            updated_at: trigger.updated_at.into(),
        }
    }
}

/// List of triggers.
pub type Triggers = Vec<Trigger>;

/// One recorded trigger event.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Trigger that matched.
    pub trigger_id: Uuid,
    /// Provider-scoped event id.
    pub external_event_id: Option<String>,
    /// Provider event type.
    pub provider_event_type: String,
    /// Idempotency key.
    pub dedup_key: Option<String>,
    /// Processing status.
    pub status: TriggerEventStatus,
    /// Why the event was skipped, when it was.
    pub skip_reason: Option<String>,
    /// Error from run creation, when it failed.
    pub error_message: Option<String>,
    /// Session spawned for this event.
    pub session_id: Option<Uuid>,
    /// When the event was recorded.
    pub created_at: Timestamp,
    /// When the event reached a terminal status.
    pub processed_at: Option<Timestamp>,
}

impl From<model::TriggerEvent> for TriggerEvent {
    fn from(event: model::TriggerEvent) -> Self {
        Self {
            event_id: event.id,
            trigger_id: event.trigger_id,
            external_event_id: event.external_event_id,
            provider_event_type: event.provider_event_type,
            dedup_key: event.dedup_key,
            status: event.status,
            skip_reason: event.skip_reason,
            error_message: event.error_message,
            session_id: event.session_id,
            created_at: event.created_at.into(),
            processed_at: event.processed_at.map(Into::into),
        }
    }
}

/// List of trigger events.
pub type TriggerEvents = Vec<TriggerEvent>;
