//! Session model: active or historical AI working contexts.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::sessions;
use crate::types::{ClientType, SessionStatus};

/// An active or historical AI working context.
///
/// `sandbox_id` is set iff the status holds a sandbox; repository
/// transitions maintain the coupling.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
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
    /// Client-specific routing metadata (channel ids, socket addresses).
    pub client_metadata: serde_json::Value,
    /// Snapshot the sandbox booted from.
    pub snapshot_id: Option<String>,
    /// Usage metrics (tokens, wall clock, credit spend).
    pub metrics: serde_json::Value,
    /// When the session was created.
    pub created_at: Timestamp,
    /// When the session was last modified.
    pub updated_at: Timestamp,
    /// When the session last saw activity.
    pub last_activity_at: Option<Timestamp>,
}

/// Data for creating a new session.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSession {
    /// Session ID; assigned by the gateway, recorded by the registry.
    pub id: Uuid,
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Configuration.
    pub configuration_id: Option<Uuid>,
    /// Sandbox, when allocated eagerly.
    pub sandbox_id: Option<String>,
    /// Sandbox provider id.
    pub sandbox_provider: String,
    /// Initial status.
    pub status: SessionStatus,
    /// Client kind.
    pub client_type: Option<ClientType>,
    /// Client metadata.
    pub client_metadata: serde_json::Value,
    /// Snapshot id.
    pub snapshot_id: Option<String>,
}

/// Data for updating a session.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateSession {
    /// Lifecycle status.
    pub status: Option<SessionStatus>,
    /// Sandbox identifier.
    pub sandbox_id: Option<Option<String>>,
    /// Pause reason.
    pub pause_reason: Option<Option<String>>,
    /// Client metadata.
    pub client_metadata: Option<serde_json::Value>,
    /// Usage metrics.
    pub metrics: Option<serde_json::Value>,
    /// Modification timestamp.
    pub updated_at: Option<Timestamp>,
    /// Last activity timestamp.
    pub last_activity_at: Option<Option<Timestamp>>,
}

impl Session {
    /// Returns whether the session currently holds a sandbox.
    pub fn holds_sandbox(&self) -> bool {
        self.status.holds_sandbox()
    }

    /// Returns whether the sandbox/status coupling invariant holds.
    pub fn sandbox_invariant_holds(&self) -> bool {
        self.sandbox_id.is_some() == self.status.holds_sandbox()
    }

    /// Returns the client source for wake routing, if a client is attached.
    pub fn client_source(&self) -> Option<prolif_core::ClientSource> {
        self.client_type.map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use jiff_diesel::Timestamp;
    use strum::IntoEnumIterator;

    use super::*;

    fn session(status: SessionStatus, sandbox_id: Option<&str>) -> Session {
        let now = Timestamp::from(jiff::Timestamp::now());
        Session {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            configuration_id: None,
            sandbox_id: sandbox_id.map(str::to_owned),
            sandbox_provider: "modal".to_owned(),
            status,
            pause_reason: None,
            client_type: Some(ClientType::Slack),
            client_metadata: serde_json::json!({}),
            snapshot_id: None,
            metrics: serde_json::json!({}),
            created_at: now,
            updated_at: now,
            last_activity_at: None,
        }
    }

    #[test]
    fn sandbox_coupling_invariant() {
        for status in SessionStatus::iter() {
            let with_sandbox = session(status, Some("sb-1"));
            let without_sandbox = session(status, None);

            assert_eq!(
                with_sandbox.sandbox_invariant_holds(),
                status.holds_sandbox(),
            );
            assert_eq!(
                without_sandbox.sandbox_invariant_holds(),
                !status.holds_sandbox(),
            );
        }
    }

    #[test]
    fn wake_routing_uses_client_type() {
        let session = session(SessionStatus::Idle, Some("sb-1"));
        assert_eq!(
            session.client_source(),
            Some(prolif_core::ClientSource::Slack)
        );
    }
}
