//! Nango-proxied SaaS webhooks (Linear, Notion, ...).
//!
//! Nango forwards provider events wrapped in an envelope carrying the
//! `connectionId` that routes the delivery to an integration. Signatures are
//! verified inline at ingress with the platform-wide Nango secret.

use prolif_core::{FieldKind, SchemaSpec};
use serde_json::Value;

use crate::event::{ProviderEvent, WebhookDelivery};
use crate::provider::{TriggerKind, TriggerProvider};
use crate::signature;
use crate::{Error, Result};

/// Header carrying the hex HMAC-SHA256 of the raw body.
pub const NANGO_SIGNATURE_HEADER: &str = "x-nango-hmac-sha256";

/// Nango webhook provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct NangoProvider;

impl TriggerProvider for NangoProvider {
    fn id(&self) -> &'static str {
        "nango"
    }

    fn kind(&self) -> TriggerKind {
        TriggerKind::Webhook
    }

    fn config_schema(&self) -> SchemaSpec {
        SchemaSpec::object()
            .optional("team", FieldKind::String)
            .optional("action", FieldKind::String)
            .one_of("action", ["create", "update", "remove"])
            .optional("labels", FieldKind::Array)
    }

    fn verify(&self, delivery: &WebhookDelivery, secret: Option<&str>) -> Result<()> {
        let Some(secret) = secret else {
            return Err(Error::missing_secret(self.id()));
        };
        let signature = delivery
            .header(NANGO_SIGNATURE_HEADER)
            .ok_or_else(|| Error::invalid_signature(self.id()))?;

        if signature::verify_hex_digest(secret, &delivery.body, signature) {
            Ok(())
        } else {
            Err(Error::invalid_signature(self.id()))
        }
    }

    fn events(&self, delivery: &WebhookDelivery) -> Vec<ProviderEvent> {
        // Nango batches: `payload` is either one event object or an array.
        let action = delivery
            .payload
            .get("payload")
            .and_then(|p| p.get("action"))
            .or_else(|| delivery.payload.get("action"))
            .and_then(Value::as_str)
            .unwrap_or("event");
        let event_type = format!("nango.{action}");

        match delivery.payload.get("payload") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| to_event(&event_type, item))
                .collect(),
            Some(item) => vec![to_event(&event_type, item)],
            None => vec![ProviderEvent::anonymous(
                event_type,
                delivery.payload.clone(),
            )],
        }
    }

    fn idempotency_key(&self, event: &ProviderEvent) -> Option<String> {
        event.external_event_id.clone()
    }

    fn filter(&self, event: &ProviderEvent, config: &Value) -> bool {
        if let Some(team) = config.get("team").and_then(Value::as_str) {
            let event_team = event
                .payload
                .get("team")
                .and_then(|t| t.get("key").or_else(|| t.get("name")))
                .and_then(Value::as_str)
                .or_else(|| event.payload.get("team").and_then(Value::as_str));
            if event_team != Some(team) {
                return false;
            }
        }

        if let Some(action) = config.get("action").and_then(Value::as_str) {
            let event_action = event
                .payload
                .get("action")
                .and_then(Value::as_str)
                .unwrap_or_else(|| event.event_type.trim_start_matches("nango."));
            if event_action != action {
                return false;
            }
        }

        true
    }

    fn context(&self, event: &ProviderEvent, _config: &Value) -> Value {
        serde_json::json!({
            "provider": self.id(),
            "eventType": event.event_type,
            "externalEventId": event.external_event_id,
            "data": event.payload,
        })
    }
}

fn to_event(event_type: &str, item: &Value) -> ProviderEvent {
    match item.get("id").and_then(Value::as_str) {
        Some(id) => ProviderEvent::new(id, event_type, item.clone()),
        None => ProviderEvent::anonymous(event_type, item.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bytes::Bytes;
    use serde_json::json;

    use super::*;
    use crate::signature::hmac_sha256_hex;

    fn delivery(payload: Value) -> WebhookDelivery {
        WebhookDelivery {
            headers: BTreeMap::new(),
            body: Bytes::from(serde_json::to_vec(&payload).unwrap()),
            payload,
        }
    }

    fn signed_delivery(payload: Value, secret: &str) -> WebhookDelivery {
        let mut delivery = delivery(payload);
        let signature = hmac_sha256_hex(secret, &delivery.body);
        delivery
            .headers
            .insert(NANGO_SIGNATURE_HEADER.to_owned(), signature);
        delivery
    }

    #[test]
    fn verify_accepts_valid_signature() {
        let delivery = signed_delivery(json!({"connectionId": "conn-1"}), "s3cret");
        assert!(NangoProvider.verify(&delivery, Some("s3cret")).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_secret_and_missing_header() {
        let signed = signed_delivery(json!({"connectionId": "conn-1"}), "s3cret");
        assert!(NangoProvider.verify(&signed, Some("other")).is_err());

        let unsigned = delivery(json!({"connectionId": "conn-1"}));
        assert!(NangoProvider.verify(&unsigned, Some("s3cret")).is_err());
        assert!(NangoProvider.verify(&signed, None).is_err());
    }

    #[test]
    fn events_extract_id_and_action() {
        let delivery = delivery(json!({
            "connectionId": "conn-1",
            "payload": {"action": "create", "id": "LIN-9", "team": {"key": "ENG"}},
        }));
        let events = NangoProvider.events(&delivery);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "nango.create");
        assert_eq!(
            NangoProvider.idempotency_key(&events[0]).as_deref(),
            Some("LIN-9")
        );
    }

    #[test]
    fn events_fan_out_batches() {
        let delivery = delivery(json!({
            "connectionId": "conn-1",
            "payload": [{"id": "LIN-1"}, {"id": "LIN-2"}],
        }));
        assert_eq!(NangoProvider.events(&delivery).len(), 2);
    }

    #[test]
    fn filter_matches_team() {
        let event = ProviderEvent::new(
            "LIN-9",
            "nango.create",
            json!({"team": {"key": "ENG"}, "action": "create"}),
        );
        assert!(NangoProvider.filter(&event, &json!({"team": "ENG"})));
        assert!(!NangoProvider.filter(&event, &json!({"team": "OPS"})));
        assert!(NangoProvider.filter(&event, &json!({})));
    }

    #[test]
    fn connection_id_from_payload() {
        let delivery = delivery(json!({"connectionId": "conn-1"}));
        assert_eq!(
            NangoProvider.connection_id(&delivery).as_deref(),
            Some("conn-1")
        );
    }
}
