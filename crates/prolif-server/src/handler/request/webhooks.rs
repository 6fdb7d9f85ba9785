//! Webhook ingress request types.

use schemars::JsonSchema;
use serde::Deserialize;

/// Query parameters accepted on `/webhooks/direct/{provider_id}`.
///
/// A routing identity may arrive in the query string instead of the body.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DirectWebhookQuery {
    #[serde(rename = "integrationId")]
    pub integration_id_camel: Option<String>,
    pub integration_id: Option<String>,
    #[serde(rename = "connectionId")]
    pub connection_id: Option<String>,
}

impl DirectWebhookQuery {
    /// Returns the routing identity carried in the query string, if any.
    pub fn routing_id(&self) -> Option<&str> {
        self.integration_id_camel
            .as_deref()
            .or(self.integration_id.as_deref())
            .or(self.connection_id.as_deref())
    }
}
