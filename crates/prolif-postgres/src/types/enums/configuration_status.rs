//! Configuration snapshot status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Snapshot build status of a sandbox configuration.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ConfigurationStatus"]
pub enum ConfigurationStatus {
    /// Created, no snapshot build attempted yet.
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[strum(serialize = "pending")]
    #[default]
    Pending,

    /// A snapshot build is in progress.
    #[db_rename = "building"]
    #[serde(rename = "building")]
    #[strum(serialize = "building")]
    Building,

    /// A snapshot exists and is usable.
    #[db_rename = "ready"]
    #[serde(rename = "ready")]
    #[strum(serialize = "ready")]
    Ready,

    /// Usable without a snapshot (provider has no snapshot concept) or
    /// promoted as the organization default.
    #[db_rename = "default"]
    #[serde(rename = "default")]
    #[strum(serialize = "default")]
    Default,

    /// The last build failed; see `error_message`.
    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    #[strum(serialize = "failed")]
    Failed,
}

impl ConfigurationStatus {
    /// Returns whether sessions can boot from this configuration.
    #[inline]
    pub fn is_usable(self) -> bool {
        matches!(
            self,
            ConfigurationStatus::Ready | ConfigurationStatus::Default
        )
    }
}
