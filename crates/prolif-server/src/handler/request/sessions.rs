//! Session lifecycle request types.

use prolif_core::ClientSource;
use prolif_postgres::types::SessionStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request payload for starting a session.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartSession {
    /// Configuration to boot from.
    pub configuration_id: Option<Uuid>,

    /// Client kind attached to the session.
    pub client_type: ClientSource,

    /// Client-specific routing metadata.
    #[serde(default)]
    pub client_metadata: serde_json::Value,

    /// Initial instruction payload.
    #[validate(length(max = 65_536))]
    pub prompt: Option<String>,

    /// Sandbox provider to allocate on.
    #[serde(default = "default_sandbox_provider")]
    #[validate(length(min = 1, max = 64))]
    pub sandbox_provider: String,
}

fn default_sandbox_provider() -> String {
    "modal".to_owned()
}

/// Request payload for pausing a session.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PauseSession {
    /// Why the session is being paused.
    #[validate(length(max = 256))]
    pub reason: Option<String>,
}

/// Gateway-originated registry update (service principal only).
///
/// The gateway reports sandbox allocation and lifecycle transitions here;
/// sandbox-holding statuses must carry the sandbox id.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRegistry {
    /// New lifecycle status.
    pub status: SessionStatus,

    /// Sandbox id; required for sandbox-holding statuses.
    #[validate(length(min = 1, max = 256))]
    pub sandbox_id: Option<String>,

    /// Pause reason for sandbox-free statuses.
    #[validate(length(max = 256))]
    pub pause_reason: Option<String>,
}

/// Query parameters for listing sessions.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsQuery {
    /// Filter by status.
    pub status: Option<SessionStatus>,
    /// Maximum records to return.
    pub limit: Option<i64>,
    /// Records to skip.
    pub offset: Option<i64>,
}
