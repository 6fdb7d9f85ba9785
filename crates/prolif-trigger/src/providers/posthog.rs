//! PostHog action webhooks addressed by automation id.

use prolif_core::{FieldKind, SchemaSpec};
use serde_json::Value;

use crate::event::{ProviderEvent, WebhookDelivery};
use crate::provider::{TriggerKind, TriggerProvider};

/// PostHog webhook provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosthogProvider;

impl TriggerProvider for PosthogProvider {
    fn id(&self) -> &'static str {
        "posthog"
    }

    fn kind(&self) -> TriggerKind {
        TriggerKind::Webhook
    }

    fn config_schema(&self) -> SchemaSpec {
        SchemaSpec::object()
            .optional("event", FieldKind::String)
            .optional("distinct_id", FieldKind::String)
    }

    fn events(&self, delivery: &WebhookDelivery) -> Vec<ProviderEvent> {
        let event_type = delivery
            .payload
            .get("event")
            .and_then(Value::as_str)
            .unwrap_or("posthog")
            .to_owned();

        let event = match delivery.payload.get("uuid").and_then(Value::as_str) {
            Some(uuid) => ProviderEvent::new(uuid, event_type, delivery.payload.clone()),
            None => ProviderEvent::anonymous(event_type, delivery.payload.clone()),
        };

        vec![event]
    }

    fn idempotency_key(&self, event: &ProviderEvent) -> Option<String> {
        event.external_event_id.clone()
    }

    fn filter(&self, event: &ProviderEvent, config: &Value) -> bool {
        if let Some(expected) = config.get("event").and_then(Value::as_str)
            && event.event_type != expected
        {
            return false;
        }

        if let Some(distinct_id) = config.get("distinct_id").and_then(Value::as_str) {
            let event_distinct = event
                .payload
                .get("distinct_id")
                .and_then(Value::as_str);
            if event_distinct != Some(distinct_id) {
                return false;
            }
        }

        true
    }

    fn context(&self, event: &ProviderEvent, _config: &Value) -> Value {
        serde_json::json!({
            "provider": self.id(),
            "eventType": event.event_type,
            "distinctId": event.payload.get("distinct_id"),
            "person": event.payload.get("person"),
            "properties": event.payload.get("properties"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    fn delivery(payload: Value) -> WebhookDelivery {
        WebhookDelivery {
            headers: BTreeMap::new(),
            body: Bytes::from(serde_json::to_vec(&payload).unwrap()),
            payload,
        }
    }

    #[test]
    fn uuid_is_idempotency_key() {
        let delivery = delivery(json!({"event": "signup", "uuid": "ph-1"}));
        let events = PosthogProvider.events(&delivery);
        assert_eq!(
            PosthogProvider.idempotency_key(&events[0]).as_deref(),
            Some("ph-1")
        );
    }

    #[test]
    fn filter_by_event_and_distinct_id() {
        let event = ProviderEvent::new(
            "ph-1",
            "signup",
            json!({"distinct_id": "user-7"}),
        );
        assert!(PosthogProvider.filter(&event, &json!({"event": "signup"})));
        assert!(!PosthogProvider.filter(&event, &json!({"event": "churn"})));
        assert!(!PosthogProvider.filter(&event, &json!({"distinct_id": "user-8"})));
    }
}
