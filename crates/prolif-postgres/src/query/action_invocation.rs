//! Action invocation repository.
//!
//! Every transition is a conditional update filtered on the expected prior
//! status, so concurrent deciders race at the database and exactly one
//! wins; the loser observes `None` and reports a conflict.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::model::{ActionInvocation, NewActionInvocation, UpdateActionInvocation};
use crate::query::Pagination;
use crate::types::InvocationStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for action invocations.
pub trait ActionInvocationRepository {
    /// Inserts a new invocation in `pending`.
    fn create_action_invocation(
        &mut self,
        new_invocation: NewActionInvocation,
    ) -> impl Future<Output = PgResult<ActionInvocation>> + Send;

    /// Finds an invocation by id.
    fn find_action_invocation_by_id(
        &mut self,
        invocation_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ActionInvocation>>> + Send;

    /// Lists invocations for a session, optionally filtered by status.
    fn list_session_invocations(
        &mut self,
        session_id: Uuid,
        status_filter: Option<InvocationStatus>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<ActionInvocation>>> + Send;

    /// Transitions `pending → approved`. Returns `None` on a status race.
    fn approve_action_invocation(
        &mut self,
        invocation_id: Uuid,
        approved_by: Uuid,
    ) -> impl Future<Output = PgResult<Option<ActionInvocation>>> + Send;

    /// Transitions `pending → denied`. Returns `None` on a status race.
    fn deny_action_invocation(
        &mut self,
        invocation_id: Uuid,
        denied_by: Uuid,
    ) -> impl Future<Output = PgResult<Option<ActionInvocation>>> + Send;

    /// Transitions `pending → expired`. Returns `None` on a status race.
    fn expire_action_invocation(
        &mut self,
        invocation_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ActionInvocation>>> + Send;

    /// Transitions `approved → executing`. Returns `None` on a status race.
    fn begin_action_execution(
        &mut self,
        invocation_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ActionInvocation>>> + Send;

    /// Transitions `executing → completed` with the adapter result.
    fn complete_action_invocation(
        &mut self,
        invocation_id: Uuid,
        result: serde_json::Value,
        duration_ms: i64,
    ) -> impl Future<Output = PgResult<Option<ActionInvocation>>> + Send;

    /// Transitions `executing → failed` with the adapter error.
    fn fail_action_invocation(
        &mut self,
        invocation_id: Uuid,
        error: &str,
        duration_ms: i64,
    ) -> impl Future<Output = PgResult<Option<ActionInvocation>>> + Send;
}

impl ActionInvocationRepository for PgConnection {
    async fn create_action_invocation(
        &mut self,
        new_invocation: NewActionInvocation,
    ) -> PgResult<ActionInvocation> {
        use schema::action_invocations;

        let invocation = diesel::insert_into(action_invocations::table)
            .values(&new_invocation)
            .returning(ActionInvocation::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(invocation)
    }

    async fn find_action_invocation_by_id(
        &mut self,
        invocation_id: Uuid,
    ) -> PgResult<Option<ActionInvocation>> {
        use schema::action_invocations::{self, dsl};

        let invocation = action_invocations::table
            .filter(dsl::id.eq(invocation_id))
            .select(ActionInvocation::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(invocation)
    }

    async fn list_session_invocations(
        &mut self,
        session_id: Uuid,
        status_filter: Option<InvocationStatus>,
        pagination: Pagination,
    ) -> PgResult<Vec<ActionInvocation>> {
        use schema::action_invocations::{self, dsl};

        let mut query = action_invocations::table
            .filter(dsl::session_id.eq(session_id))
            .into_boxed();

        if let Some(status) = status_filter {
            query = query.filter(dsl::status.eq(status));
        }

        let invocations = query
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(ActionInvocation::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(invocations)
    }

    async fn approve_action_invocation(
        &mut self,
        invocation_id: Uuid,
        approved_by: Uuid,
    ) -> PgResult<Option<ActionInvocation>> {
        let updates = UpdateActionInvocation {
            status: Some(InvocationStatus::Approved),
            approved_by: Some(Some(approved_by)),
            approved_at: Some(Some(Timestamp::from(jiff::Timestamp::now()))),
            ..Default::default()
        };

        transition(self, invocation_id, InvocationStatus::Pending, updates).await
    }

    async fn deny_action_invocation(
        &mut self,
        invocation_id: Uuid,
        denied_by: Uuid,
    ) -> PgResult<Option<ActionInvocation>> {
        let updates = UpdateActionInvocation {
            status: Some(InvocationStatus::Denied),
            approved_by: Some(Some(denied_by)),
            approved_at: Some(Some(Timestamp::from(jiff::Timestamp::now()))),
            ..Default::default()
        };

        transition(self, invocation_id, InvocationStatus::Pending, updates).await
    }

    async fn expire_action_invocation(
        &mut self,
        invocation_id: Uuid,
    ) -> PgResult<Option<ActionInvocation>> {
        let updates = UpdateActionInvocation {
            status: Some(InvocationStatus::Expired),
            ..Default::default()
        };

        transition(self, invocation_id, InvocationStatus::Pending, updates).await
    }

    async fn begin_action_execution(
        &mut self,
        invocation_id: Uuid,
    ) -> PgResult<Option<ActionInvocation>> {
        let updates = UpdateActionInvocation {
            status: Some(InvocationStatus::Executing),
            ..Default::default()
        };

        transition(self, invocation_id, InvocationStatus::Approved, updates).await
    }

    async fn complete_action_invocation(
        &mut self,
        invocation_id: Uuid,
        result: serde_json::Value,
        duration_ms: i64,
    ) -> PgResult<Option<ActionInvocation>> {
        let updates = UpdateActionInvocation {
            status: Some(InvocationStatus::Completed),
            result: Some(Some(result)),
            duration_ms: Some(Some(duration_ms)),
            ..Default::default()
        };

        transition(self, invocation_id, InvocationStatus::Executing, updates).await
    }

    async fn fail_action_invocation(
        &mut self,
        invocation_id: Uuid,
        error: &str,
        duration_ms: i64,
    ) -> PgResult<Option<ActionInvocation>> {
        let updates = UpdateActionInvocation {
            status: Some(InvocationStatus::Failed),
            error: Some(Some(error.to_owned())),
            duration_ms: Some(Some(duration_ms)),
            ..Default::default()
        };

        transition(self, invocation_id, InvocationStatus::Executing, updates).await
    }
}

/// Conditional status transition; `None` means the row was not in `from`.
async fn transition(
    conn: &mut PgConnection,
    invocation_id: Uuid,
    from: InvocationStatus,
    updates: UpdateActionInvocation,
) -> PgResult<Option<ActionInvocation>> {
    use schema::action_invocations::dsl;

    let invocation = diesel::update(
        dsl::action_invocations
            .filter(dsl::id.eq(invocation_id))
            .filter(dsl::status.eq(from)),
    )
    .set(&updates)
    .returning(ActionInvocation::as_returning())
    .get_result(conn)
    .await
    .optional()
    .map_err(PgError::from)?;

    Ok(invocation)
}
