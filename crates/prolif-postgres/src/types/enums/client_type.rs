//! Session client type enumeration.

use diesel_derive_enum::DbEnum;
use prolif_core::ClientSource;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The client kind attached to a session.
///
/// Mirrors [`ClientSource`] at the database boundary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ClientType"]
pub enum ClientType {
    #[db_rename = "web"]
    #[serde(rename = "web")]
    #[strum(serialize = "web")]
    Web,

    #[db_rename = "slack"]
    #[serde(rename = "slack")]
    #[strum(serialize = "slack")]
    Slack,

    #[db_rename = "cli"]
    #[serde(rename = "cli")]
    #[strum(serialize = "cli")]
    Cli,

    #[db_rename = "automation"]
    #[serde(rename = "automation")]
    #[strum(serialize = "automation")]
    Automation,
}

impl ClientType {
    /// Returns whether this client pulls updates asynchronously and must be
    /// woken by the session event bus.
    #[inline]
    pub fn is_async(self) -> bool {
        matches!(self, ClientType::Slack | ClientType::Cli)
    }
}

impl From<ClientSource> for ClientType {
    fn from(source: ClientSource) -> Self {
        match source {
            ClientSource::Web => ClientType::Web,
            ClientSource::Slack => ClientType::Slack,
            ClientSource::Cli => ClientType::Cli,
            ClientSource::Automation => ClientType::Automation,
        }
    }
}

impl From<ClientType> for ClientSource {
    fn from(client_type: ClientType) -> Self {
        match client_type {
            ClientType::Web => ClientSource::Web,
            ClientType::Slack => ClientSource::Slack,
            ClientType::Cli => ClientSource::Cli,
            ClientType::Automation => ClientSource::Automation,
        }
    }
}
