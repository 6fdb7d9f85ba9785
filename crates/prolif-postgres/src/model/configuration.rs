//! Configuration models: sandbox boot bundles and their repos.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::{configuration_repos, configurations};
use crate::types::ConfigurationStatus;

/// A named bundle of repo/workspace references sessions boot from.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = configurations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Configuration {
    /// Unique configuration identifier.
    pub id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Sandbox provider the snapshot targets.
    pub sandbox_provider: String,
    /// Snapshot build status.
    pub status: ConfigurationStatus,
    /// Provider-opaque snapshot identifier.
    pub snapshot_id: Option<String>,
    /// Error from the last failed build.
    pub error_message: Option<String>,
    /// When the configuration was created.
    pub created_at: Timestamp,
    /// When the configuration was last modified.
    pub updated_at: Timestamp,
}

/// Data for creating a configuration.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = configurations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewConfiguration {
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Display name (required).
    pub display_name: String,
    /// Sandbox provider id.
    pub sandbox_provider: String,
}

/// Data for updating a configuration.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = configurations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateConfiguration {
    /// Snapshot build status.
    pub status: Option<ConfigurationStatus>,
    /// Snapshot identifier.
    pub snapshot_id: Option<Option<String>>,
    /// Build error.
    pub error_message: Option<Option<String>>,
    /// Modification timestamp.
    pub updated_at: Option<Timestamp>,
}

impl Configuration {
    /// Returns whether a snapshot build can be skipped for this
    /// configuration (already usable with a snapshot recorded).
    pub fn has_usable_snapshot(&self) -> bool {
        self.status.is_usable() && self.snapshot_id.is_some()
    }
}

/// One repository baked into a configuration.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = configuration_repos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConfigurationRepo {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning configuration.
    pub configuration_id: Uuid,
    /// Clone URL.
    pub repo_url: String,
    /// Branch checked out into the snapshot.
    pub branch: String,
    /// Path the repo mounts at inside the workspace.
    pub workspace_path: String,
    /// Whether the repo needs an access token.
    pub is_private: bool,
}

/// Data for adding a repo to a configuration.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = configuration_repos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewConfigurationRepo {
    /// Configuration ID (required).
    pub configuration_id: Uuid,
    /// Clone URL (required).
    pub repo_url: String,
    /// Branch.
    pub branch: String,
    /// Workspace mount path (required).
    pub workspace_path: String,
    /// Private repo flag.
    pub is_private: bool,
}
