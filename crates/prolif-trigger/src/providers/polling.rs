//! Interval polling triggers.
//!
//! The poll worker fetches the provider resource on the trigger's cadence
//! and hands the result batch to this record as a synthetic delivery; each
//! item becomes one event deduplicated by its own id.

use prolif_core::{FieldKind, SchemaSpec};
use serde_json::Value;

use crate::event::{ProviderEvent, WebhookDelivery};
use crate::provider::{TriggerKind, TriggerProvider};

/// Polling trigger provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollingProvider;

impl TriggerProvider for PollingProvider {
    fn id(&self) -> &'static str {
        "polling"
    }

    fn kind(&self) -> TriggerKind {
        TriggerKind::Polling
    }

    fn config_schema(&self) -> SchemaSpec {
        SchemaSpec::object()
            .required("cron", FieldKind::String)
            .required("resource", FieldKind::String)
            .optional("filter", FieldKind::Object)
    }

    fn events(&self, delivery: &WebhookDelivery) -> Vec<ProviderEvent> {
        let resource = delivery
            .payload
            .get("resource")
            .and_then(Value::as_str)
            .unwrap_or("resource");
        let event_type = format!("poll.{resource}");

        match delivery.payload.get("items") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item.get("id").and_then(Value::as_str) {
                    Some(id) => ProviderEvent::new(id, event_type.clone(), item.clone()),
                    None => ProviderEvent::anonymous(event_type.clone(), item.clone()),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn idempotency_key(&self, event: &ProviderEvent) -> Option<String> {
        event.external_event_id.clone()
    }

    fn filter(&self, event: &ProviderEvent, config: &Value) -> bool {
        // Optional exact-match filter over top-level item fields.
        let Some(filter) = config.get("filter").and_then(Value::as_object) else {
            return true;
        };
        filter
            .iter()
            .all(|(key, expected)| event.payload.get(key) == Some(expected))
    }

    fn context(&self, event: &ProviderEvent, config: &Value) -> Value {
        serde_json::json!({
            "provider": self.id(),
            "eventType": event.event_type,
            "resource": config.get("resource"),
            "data": event.payload,
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
    fn poll_batches_fan_out_per_item() {
        let delivery = delivery(json!({
            "resource": "tickets",
            "items": [{"id": "t-1", "state": "open"}, {"id": "t-2", "state": "closed"}],
        }));

        let events = PollingProvider.events(&delivery);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "poll.tickets");
        assert_eq!(
            PollingProvider.idempotency_key(&events[0]).as_deref(),
            Some("t-1")
        );
    }

    #[test]
    fn filter_matches_item_fields() {
        let event = ProviderEvent::new("t-1", "poll.tickets", json!({"state": "open"}));
        assert!(PollingProvider.filter(&event, &json!({"filter": {"state": "open"}})));
        assert!(!PollingProvider.filter(&event, &json!({"filter": {"state": "closed"}})));
        assert!(PollingProvider.filter(&event, &json!({})));
    }
}
