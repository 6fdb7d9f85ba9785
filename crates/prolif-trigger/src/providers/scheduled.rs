//! Cron-driven triggers.
//!
//! Scheduled triggers never arrive through ingress; the scheduler fires them
//! and the cron worker synthesizes the delivery. The dedup key is owned by
//! the worker (`scheduled:<triggerId>:<firedAt>`), so this provider returns
//! no idempotency key of its own.

use prolif_core::{FieldKind, SchemaSpec};
use serde_json::Value;

use crate::event::{ProviderEvent, WebhookDelivery};
use crate::provider::{TriggerKind, TriggerProvider};

/// Scheduled (cron) trigger provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduledProvider;

impl TriggerProvider for ScheduledProvider {
    fn id(&self) -> &'static str {
        "scheduled"
    }

    fn kind(&self) -> TriggerKind {
        TriggerKind::Scheduled
    }

    fn config_schema(&self) -> SchemaSpec {
        SchemaSpec::object()
            .required("cron", FieldKind::String)
            .optional("timezone", FieldKind::String)
    }

    fn events(&self, delivery: &WebhookDelivery) -> Vec<ProviderEvent> {
        vec![ProviderEvent::anonymous(
            "scheduled.fire",
            delivery.payload.clone(),
        )]
    }

    fn idempotency_key(&self, _event: &ProviderEvent) -> Option<String> {
        None
    }

    fn filter(&self, _event: &ProviderEvent, _config: &Value) -> bool {
        true
    }

    fn context(&self, event: &ProviderEvent, config: &Value) -> Value {
        serde_json::json!({
            "provider": self.id(),
            "eventType": event.event_type,
            "firedAt": event.payload.get("firedAt"),
            "cron": config.get("cron"),
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
    fn fires_pass_filter_and_carry_no_key() {
        let payload = json!({"firedAt": "2026-08-01T00:00:00Z"});
        let delivery = WebhookDelivery {
            headers: BTreeMap::new(),
            body: Bytes::from(serde_json::to_vec(&payload).unwrap()),
            payload,
        };

        let events = ScheduledProvider.events(&delivery);
        assert_eq!(events.len(), 1);
        assert_eq!(ScheduledProvider.idempotency_key(&events[0]), None);
        assert!(ScheduledProvider.filter(&events[0], &json!({"cron": "0 * * * * *"})));
    }

    #[test]
    fn config_requires_cron() {
        let schema = ScheduledProvider.config_schema();
        assert!(schema.safe_parse(&json!({"cron": "0 0 * * * *"})).is_ok());
        assert!(schema.safe_parse(&json!({})).is_err());
    }
}
