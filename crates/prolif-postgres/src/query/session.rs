//! Session repository.
//!
//! Transitions set and clear `sandbox_id` together with the status so the
//! sandbox/status coupling invariant holds on every row this repository
//! writes.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::model::{NewSession, Session, UpdateSession};
use crate::query::Pagination;
use crate::types::SessionStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Per-organization session counts consumed by the admission gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounts {
    /// Sessions holding a sandbox (starting, running, idle, recovering).
    pub running: i64,
    /// Paused sessions.
    pub paused: i64,
}

/// Repository for session records.
pub trait SessionRepository {
    /// Inserts a new session.
    fn create_session(
        &mut self,
        new_session: NewSession,
    ) -> impl Future<Output = PgResult<Session>> + Send;

    /// Finds a session by id.
    fn find_session_by_id(
        &mut self,
        session_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Session>>> + Send;

    /// Lists sessions for an organization, optionally filtered by status.
    fn list_org_sessions(
        &mut self,
        organization_id: Uuid,
        status_filter: Option<SessionStatus>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Session>>> + Send;

    /// Counts sandbox-holding and paused sessions for the gate.
    fn count_org_sessions(
        &mut self,
        organization_id: Uuid,
    ) -> impl Future<Output = PgResult<SessionCounts>> + Send;

    /// Applies an update to a session.
    fn update_session(
        &mut self,
        session_id: Uuid,
        updates: UpdateSession,
    ) -> impl Future<Output = PgResult<Session>> + Send;

    /// Moves a session into a sandbox-holding status with its sandbox id.
    fn activate_session(
        &mut self,
        session_id: Uuid,
        status: SessionStatus,
        sandbox_id: String,
    ) -> impl Future<Output = PgResult<Session>> + Send;

    /// Moves a session into a sandbox-free status, clearing the sandbox.
    fn release_session(
        &mut self,
        session_id: Uuid,
        status: SessionStatus,
        pause_reason: Option<String>,
    ) -> impl Future<Output = PgResult<Session>> + Send;

    /// Stamps session activity.
    fn touch_session(
        &mut self,
        session_id: Uuid,
    ) -> impl Future<Output = PgResult<Session>> + Send;

    /// Releases every sandbox-holding session of an organization into a
    /// sandbox-free status. Returns the number of sessions released.
    ///
    /// Used for gate-mandated teardown (grace expiry).
    fn release_org_active_sessions(
        &mut self,
        organization_id: Uuid,
        status: SessionStatus,
        pause_reason: &str,
    ) -> impl Future<Output = PgResult<usize>> + Send;
}

impl SessionRepository for PgConnection {
    async fn create_session(&mut self, new_session: NewSession) -> PgResult<Session> {
        use schema::sessions;

        debug_assert_eq!(
            new_session.sandbox_id.is_some(),
            new_session.status.holds_sandbox(),
            "sandbox/status coupling violated at insert"
        );

        let session = diesel::insert_into(sessions::table)
            .values(&new_session)
            .returning(Session::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(session)
    }

    async fn find_session_by_id(&mut self, session_id: Uuid) -> PgResult<Option<Session>> {
        use schema::sessions::{self, dsl};

        let session = sessions::table
            .filter(dsl::id.eq(session_id))
            .select(Session::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(session)
    }

    async fn list_org_sessions(
        &mut self,
        organization_id: Uuid,
        status_filter: Option<SessionStatus>,
        pagination: Pagination,
    ) -> PgResult<Vec<Session>> {
        use schema::sessions::{self, dsl};

        let mut query = sessions::table
            .filter(dsl::organization_id.eq(organization_id))
            .into_boxed();

        if let Some(status) = status_filter {
            query = query.filter(dsl::status.eq(status));
        }

        let sessions = query
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Session::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(sessions)
    }

    async fn count_org_sessions(&mut self, organization_id: Uuid) -> PgResult<SessionCounts> {
        use schema::sessions::{self, dsl};

        let holding = [
            SessionStatus::Starting,
            SessionStatus::Running,
            SessionStatus::Idle,
            SessionStatus::Recovering,
        ];

        let running: i64 = sessions::table
            .filter(dsl::organization_id.eq(organization_id))
            .filter(dsl::status.eq_any(holding))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        let paused: i64 = sessions::table
            .filter(dsl::organization_id.eq(organization_id))
            .filter(dsl::status.eq(SessionStatus::Paused))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(SessionCounts { running, paused })
    }

    async fn update_session(
        &mut self,
        session_id: Uuid,
        mut updates: UpdateSession,
    ) -> PgResult<Session> {
        use schema::sessions::dsl;

        updates.updated_at = Some(Timestamp::from(jiff::Timestamp::now()));

        let session = diesel::update(dsl::sessions.filter(dsl::id.eq(session_id)))
            .set(&updates)
            .returning(Session::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(session)
    }

    async fn activate_session(
        &mut self,
        session_id: Uuid,
        status: SessionStatus,
        sandbox_id: String,
    ) -> PgResult<Session> {
        if !status.holds_sandbox() {
            return Err(PgError::Unexpected(
                format!("status {status} does not hold a sandbox").into(),
            ));
        }

        let updates = UpdateSession {
            status: Some(status),
            sandbox_id: Some(Some(sandbox_id)),
            pause_reason: Some(None),
            ..Default::default()
        };

        self.update_session(session_id, updates).await
    }

    async fn release_session(
        &mut self,
        session_id: Uuid,
        status: SessionStatus,
        pause_reason: Option<String>,
    ) -> PgResult<Session> {
        if status.holds_sandbox() {
            return Err(PgError::Unexpected(
                format!("status {status} holds a sandbox").into(),
            ));
        }

        let updates = UpdateSession {
            status: Some(status),
            sandbox_id: Some(None),
            pause_reason: Some(pause_reason),
            ..Default::default()
        };

        self.update_session(session_id, updates).await
    }

    async fn touch_session(&mut self, session_id: Uuid) -> PgResult<Session> {
        let updates = UpdateSession {
            last_activity_at: Some(Some(Timestamp::from(jiff::Timestamp::now()))),
            ..Default::default()
        };

        self.update_session(session_id, updates).await
    }

    async fn release_org_active_sessions(
        &mut self,
        organization_id: Uuid,
        status: SessionStatus,
        pause_reason: &str,
    ) -> PgResult<usize> {
        use schema::sessions::dsl;

        if status.holds_sandbox() {
            return Err(PgError::Unexpected(
                format!("status {status} holds a sandbox").into(),
            ));
        }

        let holding = [
            SessionStatus::Starting,
            SessionStatus::Running,
            SessionStatus::Idle,
            SessionStatus::Recovering,
        ];

        let released = diesel::update(
            dsl::sessions
                .filter(dsl::organization_id.eq(organization_id))
                .filter(dsl::status.eq_any(holding)),
        )
        .set((
            dsl::status.eq(status),
            dsl::sandbox_id.eq(None::<String>),
            dsl::pause_reason.eq(Some(pause_reason)),
            dsl::updated_at.eq(Timestamp::from(jiff::Timestamp::now())),
        ))
        .execute(self)
        .await
        .map_err(PgError::from)?;

        Ok(released)
    }
}
