//! Webhook delivery and provider event values.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A webhook request as captured by ingress: whitelisted headers plus the
/// raw body and its parsed JSON form.
#[derive(Debug, Clone)]
pub struct WebhookDelivery {
    /// Whitelisted headers, lowercased keys.
    pub headers: BTreeMap<String, String>,
    /// Raw request body, byte-exact for signature verification.
    pub body: Bytes,
    /// Parsed JSON payload.
    pub payload: serde_json::Value,
}

impl WebhookDelivery {
    /// Returns a header value by lowercased name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// One semantic event extracted from a webhook payload.
///
/// A single delivery may fan out into multiple events (batch payloads).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEvent {
    /// Provider-scoped event identifier, when the payload carries one.
    pub external_event_id: Option<String>,
    /// Provider event type (`issue.create`, `push`, ...).
    pub event_type: String,
    /// The event body.
    pub payload: serde_json::Value,
}

impl ProviderEvent {
    /// Creates an event with an external id.
    pub fn new(
        external_event_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            external_event_id: Some(external_event_id.into()),
            event_type: event_type.into(),
            payload,
        }
    }

    /// Creates an event without an external id.
    pub fn anonymous(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            external_event_id: None,
            event_type: event_type.into(),
            payload,
        }
    }
}
