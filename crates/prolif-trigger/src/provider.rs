//! The trigger provider capability set.

use prolif_core::SchemaSpec;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::event::{ProviderEvent, WebhookDelivery};
use crate::Result;

/// How a trigger produces events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TriggerKind {
    /// Events arrive as inbound webhooks.
    Webhook,
    /// Events are discovered by polling the provider at a cadence.
    Polling,
    /// Events are clock fires of a cron expression.
    Scheduled,
}

/// The capability set of one trigger provider.
///
/// Providers are stateless records; everything event-shaped is a pure
/// function over `(event, config)` so the worker can re-run any step
/// without side effects.
pub trait TriggerProvider: Send + Sync {
    /// Registry key and route segment (`nango`, `github-app`, ...).
    fn id(&self) -> &'static str;

    /// Provider family stored on trigger rows; usually equals [`id`].
    ///
    /// [`id`]: Self::id
    fn provider(&self) -> &'static str {
        self.id()
    }

    /// How triggers of this provider produce events.
    fn kind(&self) -> TriggerKind;

    /// Schema for the provider-specific trigger config.
    fn config_schema(&self) -> SchemaSpec;

    /// Verifies a delivery against the configured secret.
    ///
    /// The default accepts everything; providers with inline signature
    /// verification (nango, github-app) override this, and ingress calls it
    /// before persisting. Providers with deferred verification are checked
    /// by the inbox worker instead.
    fn verify(&self, _delivery: &WebhookDelivery, _secret: Option<&str>) -> Result<()> {
        Ok(())
    }

    /// Extracts semantic events from a delivery payload.
    fn events(&self, delivery: &WebhookDelivery) -> Vec<ProviderEvent>;

    /// Computes the idempotency key for an event, when one can be derived.
    ///
    /// Returns `None` for events with no stable identity; those are never
    /// deduplicated.
    fn idempotency_key(&self, event: &ProviderEvent) -> Option<String>;

    /// Returns whether an event passes the trigger's config filter.
    fn filter(&self, event: &ProviderEvent, config: &serde_json::Value) -> bool;

    /// Builds the parsed context stored on the trigger event and handed to
    /// the spawned session.
    fn context(&self, event: &ProviderEvent, config: &serde_json::Value) -> serde_json::Value;

    /// Extracts the external connection id used to route a delivery to an
    /// integration, when the payload carries one.
    fn connection_id(&self, delivery: &WebhookDelivery) -> Option<String> {
        delivery
            .payload
            .get("connectionId")
            .or_else(|| delivery.payload.get("connection_id"))
            .and_then(|v| v.as_str())
            .map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn trigger_kind_roundtrip() {
        assert_eq!(TriggerKind::Webhook.to_string(), "webhook");
        assert_eq!(
            TriggerKind::from_str("scheduled").unwrap(),
            TriggerKind::Scheduled
        );
    }
}
