//! Trigger repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::model::{NewTrigger, Trigger, UpdateTrigger};
use crate::query::Pagination;
use crate::types::TriggerType;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for trigger registrations.
pub trait TriggerRepository {
    /// Inserts a new trigger.
    fn create_trigger(
        &mut self,
        new_trigger: NewTrigger,
    ) -> impl Future<Output = PgResult<Trigger>> + Send;

    /// Finds a trigger by id.
    fn find_trigger_by_id(
        &mut self,
        trigger_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Trigger>>> + Send;

    /// Lists triggers belonging to an organization.
    fn list_org_triggers(
        &mut self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Trigger>>> + Send;

    /// Lists enabled webhook triggers routed to an integration.
    fn list_active_webhook_triggers(
        &mut self,
        integration_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Trigger>>> + Send;

    /// Lists enabled webhook triggers of a provider bound to an automation.
    ///
    /// Routing step for entity-addressed deliveries (`posthog`,
    /// `automation` routes carry the automation id in the URL).
    fn list_automation_webhook_triggers(
        &mut self,
        automation_id: Uuid,
        provider: &str,
    ) -> impl Future<Output = PgResult<Vec<Trigger>>> + Send;

    /// Lists every enabled trigger needing a scheduler registration.
    ///
    /// Used at process start to idempotently re-register repeatable jobs.
    fn list_enabled_repeatable_triggers(
        &mut self,
    ) -> impl Future<Output = PgResult<Vec<Trigger>>> + Send;

    /// Applies an update to a trigger.
    fn update_trigger(
        &mut self,
        trigger_id: Uuid,
        updates: UpdateTrigger,
    ) -> impl Future<Output = PgResult<Trigger>> + Send;

    /// Records or clears the scheduler registration key.
    fn set_trigger_repeat_key(
        &mut self,
        trigger_id: Uuid,
        repeat_job_key: Option<String>,
    ) -> impl Future<Output = PgResult<Trigger>> + Send;

    /// Deletes a trigger.
    fn delete_trigger(&mut self, trigger_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;
}

impl TriggerRepository for PgConnection {
    async fn create_trigger(&mut self, new_trigger: NewTrigger) -> PgResult<Trigger> {
        use schema::triggers;

        let trigger = diesel::insert_into(triggers::table)
            .values(&new_trigger)
            .returning(Trigger::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(trigger)
    }

    async fn find_trigger_by_id(&mut self, trigger_id: Uuid) -> PgResult<Option<Trigger>> {
        use schema::triggers::{self, dsl};

        let trigger = triggers::table
            .filter(dsl::id.eq(trigger_id))
            .select(Trigger::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(trigger)
    }

    async fn list_org_triggers(
        &mut self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> PgResult<Vec<Trigger>> {
        use schema::triggers::{self, dsl};

        let triggers = triggers::table
            .filter(dsl::organization_id.eq(organization_id))
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Trigger::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(triggers)
    }

    async fn list_active_webhook_triggers(
        &mut self,
        integration_id: Uuid,
    ) -> PgResult<Vec<Trigger>> {
        use schema::triggers::{self, dsl};

        let triggers = triggers::table
            .filter(dsl::integration_id.eq(Some(integration_id)))
            .filter(dsl::enabled.eq(true))
            .filter(dsl::trigger_type.eq(TriggerType::Webhook))
            .select(Trigger::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(triggers)
    }

    async fn list_automation_webhook_triggers(
        &mut self,
        automation_id: Uuid,
        provider: &str,
    ) -> PgResult<Vec<Trigger>> {
        use schema::triggers::{self, dsl};

        let triggers = triggers::table
            .filter(dsl::automation_id.eq(automation_id))
            .filter(dsl::provider.eq(provider))
            .filter(dsl::enabled.eq(true))
            .filter(dsl::trigger_type.eq(TriggerType::Webhook))
            .select(Trigger::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(triggers)
    }

    async fn list_enabled_repeatable_triggers(&mut self) -> PgResult<Vec<Trigger>> {
        use schema::triggers::{self, dsl};

        let repeatable = [TriggerType::Scheduled, TriggerType::Polling];

        let triggers = triggers::table
            .filter(dsl::enabled.eq(true))
            .filter(dsl::trigger_type.eq_any(repeatable))
            .select(Trigger::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(triggers)
    }

    async fn update_trigger(
        &mut self,
        trigger_id: Uuid,
        mut updates: UpdateTrigger,
    ) -> PgResult<Trigger> {
        use schema::triggers::dsl;

        updates.updated_at = Some(Timestamp::from(jiff::Timestamp::now()));

        let trigger = diesel::update(dsl::triggers.filter(dsl::id.eq(trigger_id)))
            .set(&updates)
            .returning(Trigger::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(trigger)
    }

    async fn set_trigger_repeat_key(
        &mut self,
        trigger_id: Uuid,
        repeat_job_key: Option<String>,
    ) -> PgResult<Trigger> {
        let updates = UpdateTrigger {
            repeat_job_key: Some(repeat_job_key),
            ..Default::default()
        };

        self.update_trigger(trigger_id, updates).await
    }

    async fn delete_trigger(&mut self, trigger_id: Uuid) -> PgResult<bool> {
        use schema::triggers::dsl;

        let deleted = diesel::delete(dsl::triggers.filter(dsl::id.eq(trigger_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}
