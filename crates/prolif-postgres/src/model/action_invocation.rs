//! Action invocation model: AI-requested external actions.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::action_invocations;
use crate::types::{InvocationStatus, RiskLevel};

/// A single AI-requested external action.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = action_invocations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActionInvocation {
    /// Unique invocation identifier.
    pub id: Uuid,
    /// Session that requested the action.
    pub session_id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Integration connection used for execution.
    pub integration_id: Option<Uuid>,
    /// Integration name (`linear`, `slack`, ...).
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

/// Data for creating a new invocation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = action_invocations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewActionInvocation {
    /// Session ID (required).
    pub session_id: Uuid,
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Integration connection.
    pub integration_id: Option<Uuid>,
    /// Integration name.
    pub integration: String,
    /// Action name.
    pub action: String,
    /// Risk level.
    pub risk_level: RiskLevel,
    /// Parameters.
    pub params: serde_json::Value,
    /// Approval deadline.
    pub expires_at: Option<Timestamp>,
}

/// Data for updating an invocation.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = action_invocations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateActionInvocation {
    /// Lifecycle status.
    pub status: Option<InvocationStatus>,
    /// Deciding account.
    pub approved_by: Option<Option<Uuid>>,
    /// Decision timestamp.
    pub approved_at: Option<Option<Timestamp>>,
    /// Adapter result.
    pub result: Option<Option<serde_json::Value>>,
    /// Adapter error.
    pub error: Option<Option<String>>,
    /// Execution duration.
    pub duration_ms: Option<Option<i64>>,
}

impl ActionInvocation {
    /// Returns whether the invocation reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns whether the approval TTL has elapsed.
    pub fn is_expired_at(&self, now: jiff::Timestamp) -> bool {
        self.expires_at
            .is_some_and(|deadline| jiff::Timestamp::from(deadline) <= now)
    }

    /// Returns the grant scope that would cover this invocation.
    pub fn grant_scope(&self) -> String {
        format!("{}:{}", self.integration, self.action)
    }
}
