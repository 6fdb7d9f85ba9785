//! Lifecycle owner for externally-visible side effects the AI requests.
//!
//! State machine: `pending → approved → executing → completed|failed`,
//! with `denied` and `expired` leaving `pending`. Every transition is a
//! conditional database update, so concurrent deciders cannot double-run
//! an action, and the approve→execute pair is atomic from the caller's
//! perspective: one call yields a terminal state.

use std::time::{Duration, Instant};

use prolif_core::{AdapterRequest, RuntimeServices};
use prolif_postgres::model::{ActionInvocation, NewActionGrant, NewActionInvocation};
use prolif_postgres::query::{
    ActionGrantRepository, ActionInvocationRepository, IntegrationRepository,
};
use prolif_postgres::types::{InvocationStatus, OrgRole};
use prolif_postgres::{PgConnection, PgError};
use uuid::Uuid;

/// Tracing target for the action engine.
const TRACING_TARGET: &str = "prolif_server::service::actions";

/// Default adapter execution deadline.
const DEFAULT_EXECUTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors the engine reports to callers.
#[derive(Debug)]
pub enum ActionError {
    /// No such invocation (or it belongs to another session).
    NotFound,
    /// The approval TTL elapsed before a decision.
    Expired,
    /// The invocation is not in a state accepting this operation.
    Conflict { status: InvocationStatus },
    /// The caller may not decide on actions.
    Forbidden { reason: String },
    /// The adapter raised or timed out after approval.
    Adapter { message: String },
    /// Underlying database failure.
    Database(PgError),
}

impl From<PgError> for ActionError {
    fn from(error: PgError) -> Self {
        Self::Database(error)
    }
}

/// The principal attempting an approval decision.
#[derive(Debug, Clone, Copy)]
pub struct Approver {
    pub account_id: Uuid,
    pub role: Option<OrgRole>,
    /// Whether the principal is an interactive human (not a sandbox or
    /// service token).
    pub interactive: bool,
}

impl Approver {
    fn authorize(&self) -> Result<(), ActionError> {
        if !self.interactive {
            return Err(ActionError::Forbidden {
                reason: "Only interactive users may decide on actions".to_owned(),
            });
        }

        if !self.role.is_some_and(OrgRole::can_approve_actions) {
            return Err(ActionError::Forbidden {
                reason: "Approving actions requires the owner or admin role".to_owned(),
            });
        }

        Ok(())
    }
}

/// Grant-mode payload on an approval.
#[derive(Debug, Clone)]
pub struct GrantRequest {
    /// Scope the grant covers; defaults to the invocation's own scope.
    pub scope: Option<String>,
    /// Call budget for the grant.
    pub max_calls: i32,
}

/// The action engine.
#[derive(Clone)]
pub struct ActionEngine {
    services: RuntimeServices,
    execute_timeout: Duration,
}

impl ActionEngine {
    /// Creates an engine dispatching to the given adapter registry.
    pub fn new(services: RuntimeServices) -> Self {
        Self {
            services,
            execute_timeout: DEFAULT_EXECUTE_TIMEOUT,
        }
    }

    /// Overrides the adapter execution deadline.
    pub fn with_execute_timeout(mut self, timeout: Duration) -> Self {
        self.execute_timeout = timeout;
        self
    }

    /// Approves a pending invocation and executes it to a terminal state.
    #[tracing::instrument(skip_all, fields(invocation_id = %invocation_id))]
    pub async fn approve(
        &self,
        conn: &mut PgConnection,
        session_id: Uuid,
        invocation_id: Uuid,
        approver: Approver,
        grant: Option<GrantRequest>,
    ) -> Result<ActionInvocation, ActionError> {
        approver.authorize()?;

        let invocation = self
            .load_session_invocation(conn, session_id, invocation_id)
            .await?;

        self.guard_expiry(conn, &invocation).await?;

        let Some(approved) = conn
            .approve_action_invocation(invocation_id, approver.account_id)
            .await?
        else {
            return Err(self.conflict(conn, invocation_id).await);
        };

        tracing::info!(
            target: TRACING_TARGET,
            invocation_id = %invocation_id,
            integration = %approved.integration,
            action = %approved.action,
            approved_by = %approver.account_id,
            "Invocation approved"
        );

        if let Some(grant) = grant {
            let scope = grant
                .scope
                .unwrap_or_else(|| approved.grant_scope());
            conn.create_action_grant(NewActionGrant {
                organization_id: approved.organization_id,
                session_id: approved.session_id,
                scope: scope.clone(),
                max_calls: grant.max_calls.max(1),
                granted_by: approver.account_id,
            })
            .await?;

            tracing::info!(
                target: TRACING_TARGET,
                invocation_id = %invocation_id,
                scope = %scope,
                max_calls = grant.max_calls,
                "Recorded reusable grant"
            );
        }

        self.execute(conn, approved).await
    }

    /// Denies a pending invocation.
    #[tracing::instrument(skip_all, fields(invocation_id = %invocation_id))]
    pub async fn deny(
        &self,
        conn: &mut PgConnection,
        session_id: Uuid,
        invocation_id: Uuid,
        approver: Approver,
    ) -> Result<ActionInvocation, ActionError> {
        approver.authorize()?;

        let invocation = self
            .load_session_invocation(conn, session_id, invocation_id)
            .await?;

        self.guard_expiry(conn, &invocation).await?;

        let Some(denied) = conn
            .deny_action_invocation(invocation_id, approver.account_id)
            .await?
        else {
            return Err(self.conflict(conn, invocation_id).await);
        };

        tracing::info!(
            target: TRACING_TARGET,
            invocation_id = %invocation_id,
            denied_by = %approver.account_id,
            "Invocation denied"
        );

        Ok(denied)
    }

    /// Records a new invocation, auto-executing it when an open grant
    /// covers its scope.
    #[tracing::instrument(skip_all, fields(session_id = %new_invocation.session_id))]
    pub async fn submit(
        &self,
        conn: &mut PgConnection,
        new_invocation: NewActionInvocation,
    ) -> Result<ActionInvocation, ActionError> {
        let invocation = conn.create_action_invocation(new_invocation).await?;
        let scope = invocation.grant_scope();

        let Some(grant) = conn
            .find_open_action_grant(invocation.session_id, &scope)
            .await?
        else {
            return Ok(invocation);
        };

        // Consume before executing; a raced-out consume falls back to
        // manual approval.
        let Some(grant) = conn.consume_action_grant(grant.id).await? else {
            return Ok(invocation);
        };

        let Some(approved) = conn
            .approve_action_invocation(invocation.id, grant.granted_by)
            .await?
        else {
            return Ok(invocation);
        };

        tracing::info!(
            target: TRACING_TARGET,
            invocation_id = %approved.id,
            scope = %scope,
            remaining_calls = grant.remaining_calls(),
            "Invocation auto-approved by grant"
        );

        self.execute(conn, approved).await
    }

    /// Runs the approved invocation through its adapter.
    async fn execute(
        &self,
        conn: &mut PgConnection,
        invocation: ActionInvocation,
    ) -> Result<ActionInvocation, ActionError> {
        let Some(executing) = conn.begin_action_execution(invocation.id).await? else {
            return Err(self.conflict(conn, invocation.id).await);
        };

        let started = Instant::now();
        let outcome = self.run_adapter(conn, &executing).await;
        let duration_ms = started.elapsed().as_millis() as i64;

        match outcome {
            Ok(result) => {
                let completed = conn
                    .complete_action_invocation(executing.id, result, duration_ms)
                    .await?
                    .ok_or(ActionError::Conflict {
                        status: InvocationStatus::Executing,
                    })?;

                tracing::info!(
                    target: TRACING_TARGET,
                    invocation_id = %completed.id,
                    duration_ms = duration_ms,
                    "Invocation completed"
                );
                Ok(completed)
            }
            Err(message) => {
                conn.fail_action_invocation(executing.id, &message, duration_ms)
                    .await?;

                tracing::warn!(
                    target: TRACING_TARGET,
                    invocation_id = %executing.id,
                    duration_ms = duration_ms,
                    error = %message,
                    "Invocation failed"
                );
                Err(ActionError::Adapter { message })
            }
        }
    }

    /// Calls the adapter, resolving the integration token first.
    async fn run_adapter(
        &self,
        conn: &mut PgConnection,
        invocation: &ActionInvocation,
    ) -> Result<serde_json::Value, String> {
        let Some(adapter) = self.services.adapter(&invocation.integration) else {
            return Err(format!(
                "no adapter registered for integration '{}'",
                invocation.integration
            ));
        };

        let token = match invocation.integration_id {
            Some(integration_id) => conn
                .find_integration_by_id(integration_id)
                .await
                .map_err(|e| format!("integration lookup failed: {e}"))?
                .and_then(|integration| integration.access_token),
            None => None,
        };

        let request = AdapterRequest {
            action: invocation.action.clone(),
            params: invocation.params.clone(),
            token,
        };

        match tokio::time::timeout(self.execute_timeout, adapter.execute(request)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!(
                "adapter timed out after {:?}",
                self.execute_timeout
            )),
        }
    }

    /// Loads an invocation scoped to its session.
    async fn load_session_invocation(
        &self,
        conn: &mut PgConnection,
        session_id: Uuid,
        invocation_id: Uuid,
    ) -> Result<ActionInvocation, ActionError> {
        let invocation = conn
            .find_action_invocation_by_id(invocation_id)
            .await?
            .ok_or(ActionError::NotFound)?;

        if invocation.session_id != session_id {
            return Err(ActionError::NotFound);
        }

        Ok(invocation)
    }

    /// Expires a pending invocation whose TTL has passed.
    async fn guard_expiry(
        &self,
        conn: &mut PgConnection,
        invocation: &ActionInvocation,
    ) -> Result<(), ActionError> {
        if invocation.status == InvocationStatus::Pending
            && invocation.is_expired_at(jiff::Timestamp::now())
        {
            conn.expire_action_invocation(invocation.id).await?;
            return Err(ActionError::Expired);
        }

        Ok(())
    }

    /// Builds the conflict error from the invocation's current status.
    async fn conflict(&self, conn: &mut PgConnection, invocation_id: Uuid) -> ActionError {
        match conn.find_action_invocation_by_id(invocation_id).await {
            Ok(Some(invocation)) => ActionError::Conflict {
                status: invocation.status,
            },
            Ok(None) => ActionError::NotFound,
            Err(error) => ActionError::Database(error),
        }
    }
}

impl std::fmt::Debug for ActionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEngine")
            .field("execute_timeout", &self.execute_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approver(role: Option<OrgRole>, interactive: bool) -> Approver {
        Approver {
            account_id: Uuid::new_v4(),
            role,
            interactive,
        }
    }

    #[test]
    fn member_and_service_principals_are_rejected() {
        assert!(approver(Some(OrgRole::Member), true).authorize().is_err());
        assert!(approver(Some(OrgRole::Owner), false).authorize().is_err());
        assert!(approver(None, true).authorize().is_err());
    }

    #[test]
    fn owner_and_admin_are_accepted() {
        assert!(approver(Some(OrgRole::Owner), true).authorize().is_ok());
        assert!(approver(Some(OrgRole::Admin), true).authorize().is_ok());
    }
}
