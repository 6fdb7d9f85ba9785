//! Session gateway capability.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ClientSource;
use crate::Result;

/// Input for creating a session through the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionInput {
    pub organization_id: Uuid,
    /// Automation that spawned this session, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation_id: Option<Uuid>,
    /// Trigger event that spawned this session, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_event_id: Option<Uuid>,
    /// Configuration the sandbox should boot from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_id: Option<Uuid>,
    pub client_type: ClientSource,
    #[serde(default)]
    pub client_metadata: serde_json::Value,
    /// Initial instruction payload for the AI loop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Result of a successful gateway session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedSession {
    pub session_id: Uuid,
    /// Sandbox allocated for the session, when the provider allocates eagerly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox_id: Option<String>,
}

/// Partial update applied to an existing session via the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_metadata: Option<serde_json::Value>,
}

/// RPC surface of the session gateway service.
///
/// The gateway owns sandbox allocation; the runtime core only records the
/// outcome. Implementations must be safe to call concurrently.
#[async_trait::async_trait]
pub trait SessionGateway: Send + Sync {
    /// Creates a session and (eagerly or lazily) its sandbox.
    async fn create_session(&self, input: CreateSessionInput) -> Result<CreatedSession>;

    /// Applies a partial update to a session.
    async fn update_session(&self, session_id: Uuid, patch: UpdateSessionPatch) -> Result<()>;
}
