//! Shared domain types used across the runtime.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The kind of client attached to a session.
///
/// Drives wake routing: each variant may have a registered [`WakeableClient`]
/// or none (web sessions pull their own updates).
///
/// [`WakeableClient`]: crate::WakeableClient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClientSource {
    /// Interactive web dashboard session.
    Web,
    /// Slack-driven session.
    Slack,
    /// Terminal client session.
    Cli,
    /// Session spawned by an automation run.
    Automation,
}

impl ClientSource {
    /// Returns the wire representation of this client source.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            ClientSource::Web => "web",
            ClientSource::Slack => "slack",
            ClientSource::Cli => "cli",
            ClientSource::Automation => "automation",
        }
    }

    /// Returns whether this client pulls session updates asynchronously
    /// and therefore needs to be woken when new work arrives.
    #[inline]
    pub fn is_async(self) -> bool {
        matches!(self, ClientSource::Slack | ClientSource::Cli)
    }
}

/// An operation subject to billing admission control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GatedOperation {
    /// Starting a brand-new session.
    SessionStart,
    /// Resuming a paused session.
    SessionResume,
    /// Attaching a CLI client to an existing session.
    CliConnect,
}

impl GatedOperation {
    /// Returns the wire representation of this operation.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            GatedOperation::SessionStart => "session_start",
            GatedOperation::SessionResume => "session_resume",
            GatedOperation::CliConnect => "cli_connect",
        }
    }

    /// Returns whether this operation allocates a new concurrent session slot.
    #[inline]
    pub fn allocates_slot(self) -> bool {
        matches!(
            self,
            GatedOperation::SessionStart | GatedOperation::SessionResume
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn client_source_roundtrip() {
        assert_eq!(ClientSource::Slack.as_str(), "slack");
        assert_eq!(ClientSource::from_str("slack").unwrap(), ClientSource::Slack);
        assert_eq!(ClientSource::Slack.to_string(), "slack");
    }

    #[test]
    fn async_clients() {
        assert!(ClientSource::Slack.is_async());
        assert!(ClientSource::Cli.is_async());
        assert!(!ClientSource::Web.is_async());
        assert!(!ClientSource::Automation.is_async());
    }

    #[test]
    fn gated_operation_slots() {
        assert!(GatedOperation::SessionStart.allocates_slot());
        assert!(!GatedOperation::CliConnect.allocates_slot());
        assert_eq!(GatedOperation::CliConnect.as_str(), "cli_connect");
    }
}
