//! API token principal kind enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The principal class a bearer token authenticates.
///
/// Approval endpoints require an interactive `User` principal; sandbox and
/// service tokens can never approve their own actions.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ApiTokenKind"]
pub enum ApiTokenKind {
    /// Interactive human user.
    #[db_rename = "user"]
    #[serde(rename = "user")]
    #[strum(serialize = "user")]
    #[default]
    User,

    /// Service-to-service principal.
    #[db_rename = "service"]
    #[serde(rename = "service")]
    #[strum(serialize = "service")]
    Service,

    /// Token minted for a sandbox workload.
    #[db_rename = "sandbox"]
    #[serde(rename = "sandbox")]
    #[strum(serialize = "sandbox")]
    Sandbox,
}

impl ApiTokenKind {
    /// Returns whether this principal is an interactive human.
    #[inline]
    pub fn is_interactive(self) -> bool {
        matches!(self, ApiTokenKind::User)
    }
}
