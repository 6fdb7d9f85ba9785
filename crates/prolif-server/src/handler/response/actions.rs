//! Action invocation response types.

use jiff::Timestamp;
use prolif_postgres::model;
use prolif_postgres::types::{InvocationStatus, RiskLevel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One action invocation.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    /// Unique invocation identifier.
    pub invocation_id: Uuid,
    /// Session that requested the action.
    pub session_id: Uuid,
    /// Integration name.
    pub integration: String,
    /// Action name within the integration.
    pub action: String,
    /// Blast radius classification.
    pub risk_level: RiskLevel,
    /// Action parameters.
    pub params: serde_json::Value,
    /// Lifecycle status.
    pub status: InvocationStatus,
    /// Account that approved or denied.
    pub approved_by: Option<Uuid>,
    /// When the decision was made.
    pub approved_at: Option<Timestamp>,
    /// Approval deadline.
    pub expires_at: Option<Timestamp>,
    /// Adapter result payload.
    pub result: Option<serde_json::Value>,
    /// Adapter error message.
    pub error: Option<String>,
    /// Execution duration in milliseconds.
    pub duration_ms: Option<i64>,
    /// When the invocation was requested.
    pub created_at: Timestamp,
}

impl From<model::ActionInvocation> for Invocation {
    fn from(invocation: model::ActionInvocation) -> Self {
        Self {
            invocation_id: invocation.id,
            session_id: invocation.session_id,
            integration: invocation.integration,
            action: invocation.action,
            risk_level: invocation.risk_level,
            params: invocation.params,
            status: invocation.status,
            approved_by: invocation.approved_by,
            approved_at: invocation.approved_at.map(Into::into),
            expires_at: invocation.expires_at.map(Into::into),
            result: invocation.result,
            error: invocation.error,
            duration_ms: invocation.duration_ms,
            created_at: invocation.created_at.into(),
        }
    }
}

/// List of invocations.
pub type Invocations = Vec<Invocation>;
