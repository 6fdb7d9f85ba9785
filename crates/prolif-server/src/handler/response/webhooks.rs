//! Webhook ingress response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fast-ack acknowledgement body.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct WebhookAccepted {
    /// Always true; the payload was durably accepted.
    pub ok: bool,
}

impl WebhookAccepted {
    /// The canonical acknowledgement.
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for WebhookAccepted {
    fn default() -> Self {
        Self::new()
    }
}
