//! Trigger event repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::model::{NewTriggerEvent, TriggerEvent, UpdateTriggerEvent};
use crate::query::Pagination;
use crate::types::TriggerEventStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for trigger events.
///
/// Creation surfaces the `(trigger_id, dedup_key)` unique violation via
/// [`PgError::is_unique_violation`]; callers treat it as a dedup skip, never
/// as a failure.
///
/// [`PgError::is_unique_violation`]: crate::PgError::is_unique_violation
pub trait TriggerEventRepository {
    /// Inserts a new trigger event.
    fn create_trigger_event(
        &mut self,
        new_event: NewTriggerEvent,
    ) -> impl Future<Output = PgResult<TriggerEvent>> + Send;

    /// Finds a trigger event by id.
    fn find_trigger_event_by_id(
        &mut self,
        event_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<TriggerEvent>>> + Send;

    /// Finds a trigger event by its dedup key.
    fn find_trigger_event_by_dedup(
        &mut self,
        trigger_id: Uuid,
        dedup_key: &str,
    ) -> impl Future<Output = PgResult<Option<TriggerEvent>>> + Send;

    /// Applies an update to a trigger event.
    fn update_trigger_event(
        &mut self,
        event_id: Uuid,
        updates: UpdateTriggerEvent,
    ) -> impl Future<Output = PgResult<TriggerEvent>> + Send;

    /// Marks an event completed with the session it spawned.
    fn complete_trigger_event(
        &mut self,
        event_id: Uuid,
        session_id: Uuid,
    ) -> impl Future<Output = PgResult<TriggerEvent>> + Send;

    /// Marks an event failed with the run-creation error.
    fn fail_trigger_event(
        &mut self,
        event_id: Uuid,
        error: &str,
    ) -> impl Future<Output = PgResult<TriggerEvent>> + Send;

    /// Lists events for a trigger, newest first.
    fn list_trigger_events(
        &mut self,
        trigger_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<TriggerEvent>>> + Send;
}

impl TriggerEventRepository for PgConnection {
    async fn create_trigger_event(
        &mut self,
        new_event: NewTriggerEvent,
    ) -> PgResult<TriggerEvent> {
        use schema::trigger_events;

        let event = diesel::insert_into(trigger_events::table)
            .values(&new_event)
            .returning(TriggerEvent::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(event)
    }

    async fn find_trigger_event_by_id(&mut self, event_id: Uuid) -> PgResult<Option<TriggerEvent>> {
        use schema::trigger_events::{self, dsl};

        let event = trigger_events::table
            .filter(dsl::id.eq(event_id))
            .select(TriggerEvent::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(event)
    }

    async fn find_trigger_event_by_dedup(
        &mut self,
        trigger_id: Uuid,
        dedup_key: &str,
    ) -> PgResult<Option<TriggerEvent>> {
        use schema::trigger_events::{self, dsl};

        let event = trigger_events::table
            .filter(dsl::trigger_id.eq(trigger_id))
            .filter(dsl::dedup_key.eq(Some(dedup_key)))
            .select(TriggerEvent::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(event)
    }

    async fn update_trigger_event(
        &mut self,
        event_id: Uuid,
        updates: UpdateTriggerEvent,
    ) -> PgResult<TriggerEvent> {
        use schema::trigger_events::dsl;

        let event = diesel::update(dsl::trigger_events.filter(dsl::id.eq(event_id)))
            .set(&updates)
            .returning(TriggerEvent::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(event)
    }

    async fn complete_trigger_event(
        &mut self,
        event_id: Uuid,
        session_id: Uuid,
    ) -> PgResult<TriggerEvent> {
        let updates = UpdateTriggerEvent {
            status: Some(TriggerEventStatus::Completed),
            session_id: Some(Some(session_id)),
            processed_at: Some(Some(Timestamp::from(jiff::Timestamp::now()))),
            ..Default::default()
        };

        self.update_trigger_event(event_id, updates).await
    }

    async fn fail_trigger_event(&mut self, event_id: Uuid, error: &str) -> PgResult<TriggerEvent> {
        let updates = UpdateTriggerEvent {
            status: Some(TriggerEventStatus::Failed),
            error_message: Some(Some(error.to_owned())),
            processed_at: Some(Some(Timestamp::from(jiff::Timestamp::now()))),
            ..Default::default()
        };

        self.update_trigger_event(event_id, updates).await
    }

    async fn list_trigger_events(
        &mut self,
        trigger_id: Uuid,
        pagination: Pagination,
    ) -> PgResult<Vec<TriggerEvent>> {
        use schema::trigger_events::{self, dsl};

        let events = trigger_events::table
            .filter(dsl::trigger_id.eq(trigger_id))
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(TriggerEvent::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(events)
    }
}
