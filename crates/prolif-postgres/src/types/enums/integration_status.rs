//! Integration connection status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Status of an external integration connection.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::IntegrationStatus"]
pub enum IntegrationStatus {
    /// Connection is live and routable.
    #[db_rename = "active"]
    #[serde(rename = "active")]
    #[strum(serialize = "active")]
    #[default]
    Active,

    /// Connection revoked or disabled; deliveries are dropped.
    #[db_rename = "disabled"]
    #[serde(rename = "disabled")]
    #[strum(serialize = "disabled")]
    Disabled,
}

impl IntegrationStatus {
    /// Returns whether deliveries route to this integration.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, IntegrationStatus::Active)
    }
}
