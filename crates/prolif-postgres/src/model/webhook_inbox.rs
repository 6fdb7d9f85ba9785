//! Webhook inbox model: durable, unparsed snapshots of received webhooks.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::webhook_inbox;
use crate::types::InboxStatus;

/// A durable, unparsed snapshot of a received webhook.
///
/// The payload is immutable after insert; only status bookkeeping changes.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = webhook_inbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WebhookInbox {
    /// Unique row identifier (UUIDv7, insertion-ordered).
    pub id: Uuid,
    /// Provider route the webhook arrived on.
    pub provider: String,
    /// Routing hint for entity-addressed routes (trigger or automation id).
    pub external_id: Option<String>,
    /// Whitelisted subset of request headers.
    pub headers: serde_json::Value,
    /// Raw request payload.
    pub payload: serde_json::Value,
    /// Raw signature header, when present.
    pub signature: Option<String>,
    /// When ingress accepted the request.
    pub received_at: Timestamp,
    /// Processing status.
    pub status: InboxStatus,
    /// Number of processing attempts.
    pub attempts: i32,
    /// Error from the most recent failed attempt.
    pub last_error: Option<String>,
    /// When the row reached a terminal status.
    pub completed_at: Option<Timestamp>,
}

/// Data for inserting a new inbox row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = webhook_inbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewWebhookInbox {
    /// Row ID (UUIDv7 so inbox scans stay insertion-ordered).
    pub id: Uuid,
    /// Provider route.
    pub provider: String,
    /// Routing hint.
    pub external_id: Option<String>,
    /// Whitelisted headers.
    pub headers: serde_json::Value,
    /// Raw payload.
    pub payload: serde_json::Value,
    /// Raw signature header.
    pub signature: Option<String>,
}

impl NewWebhookInbox {
    /// Creates an insert with a fresh time-ordered id.
    pub fn new(
        provider: impl Into<String>,
        external_id: Option<String>,
        headers: serde_json::Value,
        payload: serde_json::Value,
        signature: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            provider: provider.into(),
            external_id,
            headers,
            payload,
            signature,
        }
    }
}

/// Data for updating inbox bookkeeping fields.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = webhook_inbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateWebhookInbox {
    /// Processing status.
    pub status: Option<InboxStatus>,
    /// Last error message.
    pub last_error: Option<Option<String>>,
    /// Terminal timestamp.
    pub completed_at: Option<Option<Timestamp>>,
}

impl WebhookInbox {
    /// Returns whether the row still awaits a worker.
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Returns whether the row reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
