//! Trigger type enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// How a registered trigger produces events.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::TriggerType"]
pub enum TriggerType {
    /// Events arrive as inbound webhooks.
    #[db_rename = "webhook"]
    #[serde(rename = "webhook")]
    #[strum(serialize = "webhook")]
    #[default]
    Webhook,

    /// Events are discovered by polling on a cadence.
    #[db_rename = "polling"]
    #[serde(rename = "polling")]
    #[strum(serialize = "polling")]
    Polling,

    /// Events are clock fires of a cron expression.
    #[db_rename = "scheduled"]
    #[serde(rename = "scheduled")]
    #[strum(serialize = "scheduled")]
    Scheduled,
}

impl TriggerType {
    /// Returns whether triggers of this type hold a scheduler registration
    /// while enabled.
    #[inline]
    pub fn is_repeatable(self) -> bool {
        matches!(self, TriggerType::Polling | TriggerType::Scheduled)
    }
}
