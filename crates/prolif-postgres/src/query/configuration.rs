//! Configuration repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::model::{Configuration, ConfigurationRepo, NewConfiguration, UpdateConfiguration};
use crate::types::ConfigurationStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for sandbox configurations.
pub trait ConfigurationRepository {
    /// Inserts a new configuration.
    fn create_configuration(
        &mut self,
        new_configuration: NewConfiguration,
    ) -> impl Future<Output = PgResult<Configuration>> + Send;

    /// Finds a configuration by id.
    fn find_configuration_by_id(
        &mut self,
        configuration_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Configuration>>> + Send;

    /// Lists the repos baked into a configuration.
    fn list_configuration_repos(
        &mut self,
        configuration_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<ConfigurationRepo>>> + Send;

    /// Applies an update to a configuration.
    fn update_configuration(
        &mut self,
        configuration_id: Uuid,
        updates: UpdateConfiguration,
    ) -> impl Future<Output = PgResult<Configuration>> + Send;

    /// Moves a configuration to `building`.
    fn mark_configuration_building(
        &mut self,
        configuration_id: Uuid,
    ) -> impl Future<Output = PgResult<Configuration>> + Send;

    /// Stores a built snapshot and marks the configuration usable.
    fn store_configuration_snapshot(
        &mut self,
        configuration_id: Uuid,
        snapshot_id: Option<String>,
        status: ConfigurationStatus,
    ) -> impl Future<Output = PgResult<Configuration>> + Send;

    /// Marks a configuration build failed.
    fn fail_configuration(
        &mut self,
        configuration_id: Uuid,
        error: &str,
    ) -> impl Future<Output = PgResult<Configuration>> + Send;
}

impl ConfigurationRepository for PgConnection {
    async fn create_configuration(
        &mut self,
        new_configuration: NewConfiguration,
    ) -> PgResult<Configuration> {
        use schema::configurations;

        let configuration = diesel::insert_into(configurations::table)
            .values(&new_configuration)
            .returning(Configuration::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(configuration)
    }

    async fn find_configuration_by_id(
        &mut self,
        configuration_id: Uuid,
    ) -> PgResult<Option<Configuration>> {
        use schema::configurations::{self, dsl};

        let configuration = configurations::table
            .filter(dsl::id.eq(configuration_id))
            .select(Configuration::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(configuration)
    }

    async fn list_configuration_repos(
        &mut self,
        configuration_id: Uuid,
    ) -> PgResult<Vec<ConfigurationRepo>> {
        use schema::configuration_repos::{self, dsl};

        let repos = configuration_repos::table
            .filter(dsl::configuration_id.eq(configuration_id))
            .order(dsl::workspace_path.asc())
            .select(ConfigurationRepo::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(repos)
    }

    async fn update_configuration(
        &mut self,
        configuration_id: Uuid,
        mut updates: UpdateConfiguration,
    ) -> PgResult<Configuration> {
        use schema::configurations::dsl;

        updates.updated_at = Some(Timestamp::from(jiff::Timestamp::now()));

        let configuration =
            diesel::update(dsl::configurations.filter(dsl::id.eq(configuration_id)))
                .set(&updates)
                .returning(Configuration::as_returning())
                .get_result(self)
                .await
                .map_err(PgError::from)?;

        Ok(configuration)
    }

    async fn mark_configuration_building(
        &mut self,
        configuration_id: Uuid,
    ) -> PgResult<Configuration> {
        let updates = UpdateConfiguration {
            status: Some(ConfigurationStatus::Building),
            error_message: Some(None),
            ..Default::default()
        };

        self.update_configuration(configuration_id, updates).await
    }

    async fn store_configuration_snapshot(
        &mut self,
        configuration_id: Uuid,
        snapshot_id: Option<String>,
        status: ConfigurationStatus,
    ) -> PgResult<Configuration> {
        let updates = UpdateConfiguration {
            status: Some(status),
            snapshot_id: Some(snapshot_id),
            error_message: Some(None),
            ..Default::default()
        };

        self.update_configuration(configuration_id, updates).await
    }

    async fn fail_configuration(
        &mut self,
        configuration_id: Uuid,
        error: &str,
    ) -> PgResult<Configuration> {
        let updates = UpdateConfiguration {
            status: Some(ConfigurationStatus::Failed),
            error_message: Some(Some(error.to_owned())),
            ..Default::default()
        };

        self.update_configuration(configuration_id, updates).await
    }
}
