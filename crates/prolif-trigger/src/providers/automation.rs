//! Automation-chaining events: one automation's run completion feeding
//! another automation, addressed by automation id.

use prolif_core::{FieldKind, SchemaSpec};
use serde_json::Value;

use crate::event::{ProviderEvent, WebhookDelivery};
use crate::provider::{TriggerKind, TriggerProvider};

/// Automation chain provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutomationProvider;

impl TriggerProvider for AutomationProvider {
    fn id(&self) -> &'static str {
        "automation"
    }

    fn kind(&self) -> TriggerKind {
        TriggerKind::Webhook
    }

    fn config_schema(&self) -> SchemaSpec {
        SchemaSpec::object()
            .optional("status", FieldKind::String)
            .one_of("status", ["succeeded", "failed", "needs_human"])
    }

    fn events(&self, delivery: &WebhookDelivery) -> Vec<ProviderEvent> {
        let status = delivery
            .payload
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("completed");
        let event_type = format!("automation.{status}");

        let event = match delivery.payload.get("runId").and_then(Value::as_str) {
            Some(run_id) => ProviderEvent::new(run_id, event_type, delivery.payload.clone()),
            None => ProviderEvent::anonymous(event_type, delivery.payload.clone()),
        };

        vec![event]
    }

    fn idempotency_key(&self, event: &ProviderEvent) -> Option<String> {
        event.external_event_id.clone()
    }

    fn filter(&self, event: &ProviderEvent, config: &Value) -> bool {
        match config.get("status").and_then(Value::as_str) {
            Some(status) => event.payload.get("status").and_then(Value::as_str) == Some(status),
            None => true,
        }
    }

    fn context(&self, event: &ProviderEvent, _config: &Value) -> Value {
        serde_json::json!({
            "provider": self.id(),
            "eventType": event.event_type,
            "runId": event.payload.get("runId"),
            "automationId": event.payload.get("automationId"),
            "output": event.payload.get("output"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    #[test]
    fn run_id_dedups_chained_fires() {
        let payload = json!({"runId": "run-1", "status": "succeeded"});
        let delivery = WebhookDelivery {
            headers: BTreeMap::new(),
            body: Bytes::from(serde_json::to_vec(&payload).unwrap()),
            payload,
        };

        let events = AutomationProvider.events(&delivery);
        assert_eq!(events[0].event_type, "automation.succeeded");
        assert_eq!(
            AutomationProvider.idempotency_key(&events[0]).as_deref(),
            Some("run-1")
        );
        assert!(AutomationProvider.filter(&events[0], &json!({"status": "succeeded"})));
        assert!(!AutomationProvider.filter(&events[0], &json!({"status": "failed"})));
    }
}
