//! Action invocation status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle status of an AI-requested external action.
///
/// Transitions form a DAG with no return to a prior state: only `Pending`
/// may move to `Approved | Denied | Expired`, only `Approved` to
/// `Executing`, only `Executing` to `Completed | Failed`.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::InvocationStatus"]
pub enum InvocationStatus {
    /// Awaiting a human approval decision.
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[strum(serialize = "pending")]
    #[default]
    Pending,

    /// Approved; execution starts immediately.
    #[db_rename = "approved"]
    #[serde(rename = "approved")]
    #[strum(serialize = "approved")]
    Approved,

    /// Rejected by a human.
    #[db_rename = "denied"]
    #[serde(rename = "denied")]
    #[strum(serialize = "denied")]
    Denied,

    /// The adapter call is in flight.
    #[db_rename = "executing"]
    #[serde(rename = "executing")]
    #[strum(serialize = "executing")]
    Executing,

    /// Adapter returned successfully.
    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    #[strum(serialize = "completed")]
    Completed,

    /// Adapter raised or timed out.
    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    #[strum(serialize = "failed")]
    Failed,

    /// Approval TTL elapsed before a decision.
    #[db_rename = "expired"]
    #[serde(rename = "expired")]
    #[strum(serialize = "expired")]
    Expired,
}

impl InvocationStatus {
    /// Returns whether this status is terminal.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InvocationStatus::Denied
                | InvocationStatus::Expired
                | InvocationStatus::Completed
                | InvocationStatus::Failed
        )
    }

    /// Returns whether an approval decision is still possible.
    #[inline]
    pub fn is_decidable(self) -> bool {
        matches!(self, InvocationStatus::Pending)
    }

    /// Returns whether `next` is a legal transition from this status.
    pub fn can_transition_to(self, next: InvocationStatus) -> bool {
        use InvocationStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Denied)
                | (Pending, Expired)
                | (Approved, Executing)
                | (Executing, Completed)
                | (Executing, Failed)
        )
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn transitions_form_a_dag() {
        use InvocationStatus::*;

        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Denied));
        assert!(Pending.can_transition_to(Expired));
        assert!(Approved.can_transition_to(Executing));
        assert!(Executing.can_transition_to(Completed));
        assert!(Executing.can_transition_to(Failed));

        // No backward transitions from any terminal state.
        for terminal in [Denied, Expired, Completed, Failed] {
            for next in InvocationStatus::iter() {
                assert!(!terminal.can_transition_to(next));
            }
        }

        // No skipping the approval step.
        assert!(!Pending.can_transition_to(Executing));
        assert!(!Approved.can_transition_to(Completed));
    }
}
