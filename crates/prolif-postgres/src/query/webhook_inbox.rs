//! Webhook inbox repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::model::{NewWebhookInbox, WebhookInbox};
use crate::types::InboxStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for durable webhook inbox rows.
///
/// The claim operation is the first-worker-wins guard: a row moves
/// `pending → processing` exactly once; losers observe `None` and skip.
pub trait WebhookInboxRepository {
    /// Inserts a new inbox row.
    fn create_inbox_row(
        &mut self,
        new_row: NewWebhookInbox,
    ) -> impl Future<Output = PgResult<WebhookInbox>> + Send;

    /// Finds an inbox row by id.
    fn find_inbox_row(
        &mut self,
        inbox_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<WebhookInbox>>> + Send;

    /// Claims a pending row for processing.
    ///
    /// Returns `None` when the row is missing or not `pending`; exactly one
    /// concurrent claimer wins the optimistic update.
    fn claim_inbox_row(
        &mut self,
        inbox_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<WebhookInbox>>> + Send;

    /// Marks a row completed.
    fn complete_inbox_row(
        &mut self,
        inbox_id: Uuid,
    ) -> impl Future<Output = PgResult<WebhookInbox>> + Send;

    /// Marks a row failed with the error from this attempt.
    fn fail_inbox_row(
        &mut self,
        inbox_id: Uuid,
        error: &str,
    ) -> impl Future<Output = PgResult<WebhookInbox>> + Send;

    /// Returns a processing row to `pending` for queue redelivery.
    fn requeue_inbox_row(
        &mut self,
        inbox_id: Uuid,
        error: &str,
    ) -> impl Future<Output = PgResult<WebhookInbox>> + Send;

    /// Deletes terminal rows whose completion predates the cutoff.
    ///
    /// Returns the number of rows removed.
    fn delete_expired_inbox_rows(
        &mut self,
        cutoff: jiff::Timestamp,
    ) -> impl Future<Output = PgResult<usize>> + Send;
}

impl WebhookInboxRepository for PgConnection {
    async fn create_inbox_row(&mut self, new_row: NewWebhookInbox) -> PgResult<WebhookInbox> {
        use schema::webhook_inbox;

        let row = diesel::insert_into(webhook_inbox::table)
            .values(&new_row)
            .returning(WebhookInbox::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row)
    }

    async fn find_inbox_row(&mut self, inbox_id: Uuid) -> PgResult<Option<WebhookInbox>> {
        use schema::webhook_inbox::{self, dsl};

        let row = webhook_inbox::table
            .filter(dsl::id.eq(inbox_id))
            .select(WebhookInbox::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(row)
    }

    async fn claim_inbox_row(&mut self, inbox_id: Uuid) -> PgResult<Option<WebhookInbox>> {
        use schema::webhook_inbox::dsl;

        let row = diesel::update(
            dsl::webhook_inbox
                .filter(dsl::id.eq(inbox_id))
                .filter(dsl::status.eq(InboxStatus::Pending)),
        )
        .set((
            dsl::status.eq(InboxStatus::Processing),
            dsl::attempts.eq(dsl::attempts + 1),
        ))
        .returning(WebhookInbox::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)?;

        Ok(row)
    }

    async fn complete_inbox_row(&mut self, inbox_id: Uuid) -> PgResult<WebhookInbox> {
        use schema::webhook_inbox::dsl;

        let row = diesel::update(dsl::webhook_inbox.filter(dsl::id.eq(inbox_id)))
            .set((
                dsl::status.eq(InboxStatus::Completed),
                dsl::completed_at.eq(Some(Timestamp::from(jiff::Timestamp::now()))),
            ))
            .returning(WebhookInbox::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row)
    }

    async fn fail_inbox_row(&mut self, inbox_id: Uuid, error: &str) -> PgResult<WebhookInbox> {
        use schema::webhook_inbox::dsl;

        let row = diesel::update(dsl::webhook_inbox.filter(dsl::id.eq(inbox_id)))
            .set((
                dsl::status.eq(InboxStatus::Failed),
                dsl::last_error.eq(Some(error)),
                dsl::completed_at.eq(Some(Timestamp::from(jiff::Timestamp::now()))),
            ))
            .returning(WebhookInbox::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(row)
    }

    async fn requeue_inbox_row(&mut self, inbox_id: Uuid, error: &str) -> PgResult<WebhookInbox> {
        use schema::webhook_inbox::dsl;

        let row = diesel::update(
            dsl::webhook_inbox
                .filter(dsl::id.eq(inbox_id))
                .filter(dsl::status.eq(InboxStatus::Processing)),
        )
        .set((
            dsl::status.eq(InboxStatus::Pending),
            dsl::last_error.eq(Some(error)),
        ))
        .returning(WebhookInbox::as_returning())
        .get_result(self)
        .await
        .map_err(PgError::from)?;

        Ok(row)
    }

    async fn delete_expired_inbox_rows(&mut self, cutoff: jiff::Timestamp) -> PgResult<usize> {
        use schema::webhook_inbox::dsl;

        let terminal = [
            InboxStatus::Completed,
            InboxStatus::Failed,
            InboxStatus::Skipped,
        ];

        let deleted = diesel::delete(
            dsl::webhook_inbox
                .filter(dsl::status.eq_any(terminal))
                .filter(dsl::completed_at.lt(Some(Timestamp::from(cutoff)))),
        )
        .execute(self)
        .await
        .map_err(PgError::from)?;

        Ok(deleted)
    }
}
