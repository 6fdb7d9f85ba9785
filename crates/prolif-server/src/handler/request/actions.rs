//! Action approval request types.

use prolif_postgres::types::InvocationStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Approval mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalMode {
    /// Approve this invocation only.
    Single,
    /// Approve and record a reusable grant.
    Grant,
}

/// Reusable grant parameters.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GrantSpec {
    /// Scope covered; defaults to the invocation's `integration:action`.
    #[validate(length(min = 1, max = 256))]
    pub scope: Option<String>,

    /// Call budget for the grant.
    #[validate(range(min = 1, max = 10_000))]
    pub max_calls: i32,
}

/// Request payload for approving an invocation.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAction {
    /// Approval mode; absent means single approval.
    pub mode: Option<ApprovalMode>,

    /// Grant parameters; required when mode is `grant`.
    #[validate(nested)]
    pub grant: Option<GrantSpec>,
}

impl ApproveAction {
    /// Returns the grant spec when grant mode was requested.
    pub fn grant_request(&self) -> Option<&GrantSpec> {
        match self.mode {
            Some(ApprovalMode::Grant) => self.grant.as_ref(),
            _ => None,
        }
    }
}

/// Query parameters for listing session invocations.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListInvocationsQuery {
    /// Filter by status.
    pub status: Option<InvocationStatus>,
    /// Maximum records to return.
    pub limit: Option<i64>,
    /// Records to skip.
    pub offset: Option<i64>,
}
