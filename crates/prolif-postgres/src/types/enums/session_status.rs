//! Session status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle status of an AI working context.
///
/// A session holds a sandbox exactly while its status is one of the
/// sandbox-holding states; repository transitions set and clear
/// `sandbox_id` together with the status.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::SessionStatus"]
pub enum SessionStatus {
    /// Sandbox allocated, boot in progress.
    #[db_rename = "starting"]
    #[serde(rename = "starting")]
    #[strum(serialize = "starting")]
    #[default]
    Starting,

    /// Actively executing work.
    #[db_rename = "running"]
    #[serde(rename = "running")]
    #[strum(serialize = "running")]
    Running,

    /// Sandbox alive, waiting for input.
    #[db_rename = "idle"]
    #[serde(rename = "idle")]
    #[strum(serialize = "idle")]
    Idle,

    /// Sandbox released, resumable later.
    #[db_rename = "paused"]
    #[serde(rename = "paused")]
    #[strum(serialize = "paused")]
    Paused,

    /// Finished normally.
    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    #[strum(serialize = "completed")]
    Completed,

    /// Finished with an unrecoverable error.
    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    #[strum(serialize = "failed")]
    Failed,

    /// Sandbox being re-established after an interruption.
    #[db_rename = "recovering"]
    #[serde(rename = "recovering")]
    #[strum(serialize = "recovering")]
    Recovering,
}

impl SessionStatus {
    /// Returns whether a session in this status holds a sandbox.
    #[inline]
    pub fn holds_sandbox(self) -> bool {
        matches!(
            self,
            SessionStatus::Starting
                | SessionStatus::Running
                | SessionStatus::Idle
                | SessionStatus::Recovering
        )
    }

    /// Returns whether the session counts against the concurrency limit.
    #[inline]
    pub fn is_concurrent(self) -> bool {
        self.holds_sandbox()
    }

    /// Returns whether the session is paused.
    #[inline]
    pub fn is_paused(self) -> bool {
        matches!(self, SessionStatus::Paused)
    }

    /// Returns whether the session has finished.
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }
}
