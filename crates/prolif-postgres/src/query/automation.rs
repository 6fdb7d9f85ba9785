//! Automation repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Automation, NewAutomation, UpdateAutomation};
use crate::query::Pagination;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for automations.
pub trait AutomationRepository {
    /// Inserts a new automation.
    fn create_automation(
        &mut self,
        new_automation: NewAutomation,
    ) -> impl Future<Output = PgResult<Automation>> + Send;

    /// Finds an automation by id.
    fn find_automation_by_id(
        &mut self,
        automation_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Automation>>> + Send;

    /// Lists automations belonging to an organization.
    fn list_org_automations(
        &mut self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Automation>>> + Send;

    /// Applies an update to an automation.
    fn update_automation(
        &mut self,
        automation_id: Uuid,
        updates: UpdateAutomation,
    ) -> impl Future<Output = PgResult<Automation>> + Send;
}

impl AutomationRepository for PgConnection {
    async fn create_automation(&mut self, new_automation: NewAutomation) -> PgResult<Automation> {
        use schema::automations;

        let automation = diesel::insert_into(automations::table)
            .values(&new_automation)
            .returning(Automation::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(automation)
    }

    async fn find_automation_by_id(
        &mut self,
        automation_id: Uuid,
    ) -> PgResult<Option<Automation>> {
        use schema::automations::{self, dsl};

        let automation = automations::table
            .filter(dsl::id.eq(automation_id))
            .select(Automation::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(automation)
    }

    async fn list_org_automations(
        &mut self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> PgResult<Vec<Automation>> {
        use schema::automations::{self, dsl};

        let automations = automations::table
            .filter(dsl::organization_id.eq(organization_id))
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Automation::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(automations)
    }

    async fn update_automation(
        &mut self,
        automation_id: Uuid,
        mut updates: UpdateAutomation,
    ) -> PgResult<Automation> {
        use schema::automations::dsl;

        updates.updated_at = Some(jiff_diesel::Timestamp::from(jiff::Timestamp::now()));

        let automation = diesel::update(dsl::automations.filter(dsl::id.eq(automation_id)))
            .set(&updates)
            .returning(Automation::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(automation)
    }
}
