//! Action adapter capability.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Input for executing an approved action against an integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterRequest {
    /// Action name within the integration (`create-issue`, `send-message`).
    pub action: String,
    /// Action parameters as requested by the AI loop.
    pub params: serde_json::Value,
    /// Integration access token resolved from the connection record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Executes externally-visible actions for one integration.
///
/// Adapters are only invoked after the invocation has passed the approval
/// state machine; they never see pending or denied invocations.
#[async_trait::async_trait]
pub trait ActionAdapter: Send + Sync {
    /// The integration this adapter serves (`linear`, `slack`, ...).
    fn integration(&self) -> &'static str;

    /// Executes the action and returns its result payload.
    async fn execute(&self, request: AdapterRequest) -> Result<serde_json::Value>;
}
