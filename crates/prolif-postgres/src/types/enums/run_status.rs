//! Automation run status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Execution status of a single automation firing.
///
/// `Queued` is terminal only via `Enriching` or `Failed`.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::RunStatus"]
pub enum RunStatus {
    /// Created, waiting for context enrichment.
    #[db_rename = "queued"]
    #[serde(rename = "queued")]
    #[strum(serialize = "queued")]
    #[default]
    Queued,

    /// Gathering context before the session boots.
    #[db_rename = "enriching"]
    #[serde(rename = "enriching")]
    #[strum(serialize = "enriching")]
    Enriching,

    /// Context assembled, session boot pending.
    #[db_rename = "ready"]
    #[serde(rename = "ready")]
    #[strum(serialize = "ready")]
    Ready,

    /// The session is actively working.
    #[db_rename = "running"]
    #[serde(rename = "running")]
    #[strum(serialize = "running")]
    Running,

    /// Completed successfully.
    #[db_rename = "succeeded"]
    #[serde(rename = "succeeded")]
    #[strum(serialize = "succeeded")]
    Succeeded,

    /// Completed with an error.
    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    #[strum(serialize = "failed")]
    Failed,

    /// Paused pending a human decision.
    #[db_rename = "needs_human"]
    #[serde(rename = "needs_human")]
    #[strum(serialize = "needs_human")]
    NeedsHuman,

    /// Exceeded its execution deadline.
    #[db_rename = "timed_out"]
    #[serde(rename = "timed_out")]
    #[strum(serialize = "timed_out")]
    TimedOut,
}

impl RunStatus {
    /// Returns whether the run is still active.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(
            self,
            RunStatus::Queued | RunStatus::Enriching | RunStatus::Ready | RunStatus::Running
        )
    }

    /// Returns whether the run has finished.
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::NeedsHuman | RunStatus::TimedOut
        )
    }
}
