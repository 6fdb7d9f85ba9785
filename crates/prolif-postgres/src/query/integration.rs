//! Integration repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Integration, NewIntegration};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for integration connections.
pub trait IntegrationRepository {
    /// Inserts a new integration.
    fn create_integration(
        &mut self,
        new_integration: NewIntegration,
    ) -> impl Future<Output = PgResult<Integration>> + Send;

    /// Finds an integration by id.
    fn find_integration_by_id(
        &mut self,
        integration_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Integration>>> + Send;

    /// Resolves an external connection id to an integration.
    ///
    /// This is the webhook routing step: `(provider, connection_id)` is
    /// unique, so a delivery resolves to at most one integration.
    fn find_integration_by_connection(
        &mut self,
        provider: &str,
        connection_id: &str,
    ) -> impl Future<Output = PgResult<Option<Integration>>> + Send;
}

impl IntegrationRepository for PgConnection {
    async fn create_integration(
        &mut self,
        new_integration: NewIntegration,
    ) -> PgResult<Integration> {
        use schema::integrations;

        let integration = diesel::insert_into(integrations::table)
            .values(&new_integration)
            .returning(Integration::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(integration)
    }

    async fn find_integration_by_id(
        &mut self,
        integration_id: Uuid,
    ) -> PgResult<Option<Integration>> {
        use schema::integrations::{self, dsl};

        let integration = integrations::table
            .filter(dsl::id.eq(integration_id))
            .select(Integration::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(integration)
    }

    async fn find_integration_by_connection(
        &mut self,
        provider: &str,
        connection_id: &str,
    ) -> PgResult<Option<Integration>> {
        use schema::integrations::{self, dsl};

        let integration = integrations::table
            .filter(dsl::provider.eq(provider))
            .filter(dsl::connection_id.eq(connection_id))
            .select(Integration::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(integration)
    }
}
