//! Trigger event model: one external happening mapped to one trigger.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::trigger_events;
use crate::types::TriggerEventStatus;

/// One external happening mapped to one trigger.
///
/// `(trigger_id, dedup_key)` is unique when `dedup_key` is non-null; that
/// constraint, not worker ordering, is the dedup boundary.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = trigger_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TriggerEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// Trigger that matched the happening.
    pub trigger_id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Provider-scoped event identifier.
    pub external_event_id: Option<String>,
    /// Provider event type.
    pub provider_event_type: String,
    /// Raw provider payload.
    pub raw_payload: serde_json::Value,
    /// Context extracted for the spawned session.
    pub parsed_context: serde_json::Value,
    /// Provider idempotency key.
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

/// Data for creating a new trigger event.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trigger_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTriggerEvent {
    /// Trigger ID (required).
    pub trigger_id: Uuid,
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Provider event id.
    pub external_event_id: Option<String>,
    /// Provider event type.
    pub provider_event_type: String,
    /// Raw payload.
    pub raw_payload: serde_json::Value,
    /// Parsed context.
    pub parsed_context: serde_json::Value,
    /// Idempotency key.
    pub dedup_key: Option<String>,
    /// Initial status.
    pub status: TriggerEventStatus,
    /// Skip reason for events recorded as skipped.
    pub skip_reason: Option<String>,
}

/// Data for updating a trigger event.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = trigger_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateTriggerEvent {
    /// Processing status.
    pub status: Option<TriggerEventStatus>,
    /// Skip reason.
    pub skip_reason: Option<Option<String>>,
    /// Error message.
    pub error_message: Option<Option<String>>,
    /// Spawned session.
    pub session_id: Option<Option<Uuid>>,
    /// Terminal timestamp.
    pub processed_at: Option<Option<Timestamp>>,
}

impl TriggerEvent {
    /// Returns whether the event reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns whether the event was deliberately skipped.
    pub fn is_skipped(&self) -> bool {
        self.status.is_skipped()
    }
}
