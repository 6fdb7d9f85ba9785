//! Automation run repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::model::{AutomationRun, NewAutomationRun, UpdateAutomationRun};
use crate::query::Pagination;
use crate::types::RunStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for automation runs.
pub trait AutomationRunRepository {
    /// Inserts a new run.
    fn create_automation_run(
        &mut self,
        new_run: NewAutomationRun,
    ) -> impl Future<Output = PgResult<AutomationRun>> + Send;

    /// Finds a run by id.
    fn find_automation_run_by_id(
        &mut self,
        run_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<AutomationRun>>> + Send;

    /// Lists runs for an organization, optionally filtered by status.
    fn list_org_runs(
        &mut self,
        organization_id: Uuid,
        status_filter: Option<RunStatus>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<AutomationRun>>> + Send;

    /// Applies an update to a run.
    fn update_automation_run(
        &mut self,
        run_id: Uuid,
        updates: UpdateAutomationRun,
    ) -> impl Future<Output = PgResult<AutomationRun>> + Send;

    /// Records the session carrying out a run and moves it to `running`.
    fn start_automation_run(
        &mut self,
        run_id: Uuid,
        session_id: Uuid,
    ) -> impl Future<Output = PgResult<AutomationRun>> + Send;

    /// Marks a run finished with the given terminal status.
    fn finish_automation_run(
        &mut self,
        run_id: Uuid,
        status: RunStatus,
        error_message: Option<String>,
    ) -> impl Future<Output = PgResult<AutomationRun>> + Send;
}

impl AutomationRunRepository for PgConnection {
    async fn create_automation_run(
        &mut self,
        new_run: NewAutomationRun,
    ) -> PgResult<AutomationRun> {
        use schema::automation_runs;

        let run = diesel::insert_into(automation_runs::table)
            .values(&new_run)
            .returning(AutomationRun::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(run)
    }

    async fn find_automation_run_by_id(&mut self, run_id: Uuid) -> PgResult<Option<AutomationRun>> {
        use schema::automation_runs::{self, dsl};

        let run = automation_runs::table
            .filter(dsl::id.eq(run_id))
            .select(AutomationRun::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(run)
    }

    async fn list_org_runs(
        &mut self,
        organization_id: Uuid,
        status_filter: Option<RunStatus>,
        pagination: Pagination,
    ) -> PgResult<Vec<AutomationRun>> {
        use schema::automation_runs::{self, dsl};

        let mut query = automation_runs::table
            .filter(dsl::organization_id.eq(organization_id))
            .into_boxed();

        if let Some(status) = status_filter {
            query = query.filter(dsl::status.eq(status));
        }

        let runs = query
            .order(dsl::queued_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(AutomationRun::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(runs)
    }

    async fn update_automation_run(
        &mut self,
        run_id: Uuid,
        updates: UpdateAutomationRun,
    ) -> PgResult<AutomationRun> {
        use schema::automation_runs::dsl;

        let run = diesel::update(dsl::automation_runs.filter(dsl::id.eq(run_id)))
            .set(&updates)
            .returning(AutomationRun::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(run)
    }

    async fn start_automation_run(
        &mut self,
        run_id: Uuid,
        session_id: Uuid,
    ) -> PgResult<AutomationRun> {
        let updates = UpdateAutomationRun {
            status: Some(RunStatus::Running),
            session_id: Some(Some(session_id)),
            ..Default::default()
        };

        self.update_automation_run(run_id, updates).await
    }

    async fn finish_automation_run(
        &mut self,
        run_id: Uuid,
        status: RunStatus,
        error_message: Option<String>,
    ) -> PgResult<AutomationRun> {
        let updates = UpdateAutomationRun {
            status: Some(status),
            error_message: Some(error_message),
            completed_at: Some(Some(Timestamp::from(jiff::Timestamp::now()))),
            ..Default::default()
        };

        self.update_automation_run(run_id, updates).await
    }
}
