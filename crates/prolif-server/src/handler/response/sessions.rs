//! Session response types.

use jiff::Timestamp;
use prolif_postgres::model;
use prolif_postgres::types::{ClientType, SessionStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One session record.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier.
    pub session_id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Configuration the sandbox booted from.
    pub configuration_id: Option<Uuid>,
    /// Provider-scoped sandbox identifier.
    pub sandbox_id: Option<String>,
    /// Sandbox provider id.
    pub sandbox_provider: String,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Why the session is paused, when it is.
    pub pause_reason: Option<String>,
    /// Client kind attached to the session.
    pub client_type: Option<ClientType>,
    /// Snapshot the sandbox booted from.
    pub snapshot_id: Option<String>,
    /// When the session was created.
    pub created_at: Timestamp,
    /// When the session last saw activity.
    pub last_activity_at: Option<Timestamp>,
}

impl From<model::Session> for Session {
    fn from(session: model::Session) -> Self {
        Self {
            session_id: session.id,
            organization_id: session.organization_id,
            configuration_id: session.configuration_id,
            sandbox_id: session.sandbox_id,
            sandbox_provider: session.sandbox_provider,
            status: session.status,
            pause_reason: session.pause_reason,
            client_type: session.client_type,
            snapshot_id: session.snapshot_id,
            created_at: session.created_at.into(),
            last_activity_at: session.last_activity_at.map(Into::into),
        }
    }
}

/// List of sessions.
pub type Sessions = Vec<Session>;
