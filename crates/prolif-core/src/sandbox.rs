//! Sandbox provider capability.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// One repository baked into a configuration snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRepo {
    pub url: String,
    /// Access token for private repositories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub workspace_path: String,
    pub branch: String,
}

/// Input for building a configuration snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRequest {
    pub configuration_id: Uuid,
    pub repos: Vec<SnapshotRepo>,
}

/// A sandbox backend the runtime can allocate workspaces on.
#[async_trait::async_trait]
pub trait SandboxProvider: Send + Sync {
    /// Stable provider identifier (`modal`, `fly`, ...).
    fn id(&self) -> &'static str;

    /// Whether this provider supports reusable base-image snapshots.
    ///
    /// Providers without snapshot support boot sessions from scratch; the
    /// snapshot builder marks their configurations ready without building.
    fn supports_snapshots(&self) -> bool;

    /// Builds a reusable base image for a configuration and returns its id.
    async fn create_configuration_snapshot(&self, request: SnapshotRequest) -> Result<String>;

    /// Writes an env file into a running sandbox.
    async fn write_env_file(&self, sandbox_id: &str, env: &BTreeMap<String, String>)
    -> Result<()>;
}
