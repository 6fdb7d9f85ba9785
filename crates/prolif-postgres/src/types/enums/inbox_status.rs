//! Inbox row status enumeration for webhook ingestion lifecycle.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Processing status of a durable webhook inbox row.
///
/// Status advances monotonically except for the `processing → pending`
/// requeue the retry path takes.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::InboxStatus"]
pub enum InboxStatus {
    /// Accepted by ingress, not yet claimed by a worker.
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[strum(serialize = "pending")]
    #[default]
    Pending,

    /// Claimed by a worker; at most one worker holds the claim.
    #[db_rename = "processing"]
    #[serde(rename = "processing")]
    #[strum(serialize = "processing")]
    Processing,

    /// All contained events were routed (possibly to zero triggers).
    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    #[strum(serialize = "completed")]
    Completed,

    /// Processing raised an unhandled error; retries may requeue.
    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    #[strum(serialize = "failed")]
    Failed,

    /// Deliberately not processed (idempotent reprocess guard).
    #[db_rename = "skipped"]
    #[serde(rename = "skipped")]
    #[strum(serialize = "skipped")]
    Skipped,
}

impl InboxStatus {
    /// Returns whether this row still awaits a worker.
    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(self, InboxStatus::Pending)
    }

    /// Returns whether this row has reached a terminal state.
    ///
    /// Terminal rows are eligible for retention GC.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InboxStatus::Completed | InboxStatus::Failed | InboxStatus::Skipped
        )
    }
}
