//! Trigger event status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Processing status of one external happening mapped to one trigger.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::TriggerEventStatus"]
pub enum TriggerEventStatus {
    /// Recorded, not yet acted upon.
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[strum(serialize = "pending")]
    #[default]
    Pending,

    /// A run is being created for this event.
    #[db_rename = "processing"]
    #[serde(rename = "processing")]
    #[strum(serialize = "processing")]
    Processing,

    /// A run (and session) was created.
    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    #[strum(serialize = "completed")]
    Completed,

    /// Run creation failed; the queue may retry the inbox row.
    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    #[strum(serialize = "failed")]
    Failed,

    /// Deliberately not acted upon (filter mismatch, disabled automation).
    #[db_rename = "skipped"]
    #[serde(rename = "skipped")]
    #[strum(serialize = "skipped")]
    Skipped,
}

impl TriggerEventStatus {
    /// Returns whether the event reached a terminal state.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TriggerEventStatus::Completed
                | TriggerEventStatus::Failed
                | TriggerEventStatus::Skipped
        )
    }

    /// Returns whether the event was deliberately skipped.
    #[inline]
    pub fn is_skipped(self) -> bool {
        matches!(self, TriggerEventStatus::Skipped)
    }
}
