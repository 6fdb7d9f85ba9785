//! Action risk level enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Blast radius classification of an external action.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::RiskLevel"]
pub enum RiskLevel {
    /// Read-only; no external state change.
    #[db_rename = "read"]
    #[serde(rename = "read")]
    #[strum(serialize = "read")]
    Read,

    /// Creates or mutates external state.
    #[db_rename = "write"]
    #[serde(rename = "write")]
    #[strum(serialize = "write")]
    #[default]
    Write,

    /// Destructive or hard-to-reverse.
    #[db_rename = "danger"]
    #[serde(rename = "danger")]
    #[strum(serialize = "danger")]
    Danger,
}
