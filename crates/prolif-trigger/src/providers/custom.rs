//! User-defined webhooks addressed by trigger id.
//!
//! Ingress cannot verify these inline (the secret lives on the trigger row),
//! so verification is deferred to the inbox worker after routing.

use prolif_core::{FieldKind, SchemaSpec};
use serde_json::Value;

use crate::event::{ProviderEvent, WebhookDelivery};
use crate::provider::{TriggerKind, TriggerProvider};
use crate::signature;
use crate::{Error, Result};

/// Header carrying the optional hex HMAC of the raw body.
pub const CUSTOM_SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Custom webhook provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomProvider;

impl TriggerProvider for CustomProvider {
    fn id(&self) -> &'static str {
        "custom"
    }

    fn kind(&self) -> TriggerKind {
        TriggerKind::Webhook
    }

    fn config_schema(&self) -> SchemaSpec {
        SchemaSpec::object()
            .optional("secret", FieldKind::String)
            .optional("event", FieldKind::String)
    }

    fn verify(&self, delivery: &WebhookDelivery, secret: Option<&str>) -> Result<()> {
        // No secret configured means the trigger accepts unsigned deliveries.
        let Some(secret) = secret else {
            return Ok(());
        };
        let signature = delivery
            .header(CUSTOM_SIGNATURE_HEADER)
            .ok_or_else(|| Error::invalid_signature(self.id()))?;

        if signature::verify_hex_digest(secret, &delivery.body, signature) {
            Ok(())
        } else {
            Err(Error::invalid_signature(self.id()))
        }
    }

    fn events(&self, delivery: &WebhookDelivery) -> Vec<ProviderEvent> {
        let event_type = delivery
            .payload
            .get("event")
            .and_then(Value::as_str)
            .unwrap_or("custom")
            .to_owned();

        let event = match delivery.payload.get("id").and_then(Value::as_str) {
            Some(id) => ProviderEvent::new(id, event_type, delivery.payload.clone()),
            None => ProviderEvent::anonymous(event_type, delivery.payload.clone()),
        };

        vec![event]
    }

    fn idempotency_key(&self, event: &ProviderEvent) -> Option<String> {
        event.external_event_id.clone().or_else(|| {
            event
                .payload
                .get("idempotency_key")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
    }

    fn filter(&self, event: &ProviderEvent, config: &Value) -> bool {
        match config.get("event").and_then(Value::as_str) {
            Some(expected) => event.event_type == expected,
            None => true,
        }
    }

    fn context(&self, event: &ProviderEvent, _config: &Value) -> Value {
        serde_json::json!({
            "provider": self.id(),
            "eventType": event.event_type,
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
    use crate::signature::hmac_sha256_hex;

    fn delivery(payload: Value) -> WebhookDelivery {
        WebhookDelivery {
            headers: BTreeMap::new(),
            body: Bytes::from(serde_json::to_vec(&payload).unwrap()),
            payload,
        }
    }

    #[test]
    fn unsigned_deliveries_pass_without_secret() {
        let delivery = delivery(json!({"event": "deploy"}));
        assert!(CustomProvider.verify(&delivery, None).is_ok());
        assert!(CustomProvider.verify(&delivery, Some("secret")).is_err());
    }

    #[test]
    fn signed_deliveries_verify_against_trigger_secret() {
        let mut delivery = delivery(json!({"event": "deploy"}));
        let signature = hmac_sha256_hex("trigger-secret", &delivery.body);
        delivery
            .headers
            .insert(CUSTOM_SIGNATURE_HEADER.to_owned(), signature);

        assert!(CustomProvider.verify(&delivery, Some("trigger-secret")).is_ok());
        assert!(CustomProvider.verify(&delivery, Some("wrong")).is_err());
    }

    #[test]
    fn idempotency_falls_back_to_explicit_key() {
        let with_id = ProviderEvent::new("evt-1", "deploy", json!({}));
        assert_eq!(
            CustomProvider.idempotency_key(&with_id).as_deref(),
            Some("evt-1")
        );

        let with_key =
            ProviderEvent::anonymous("deploy", json!({"idempotency_key": "dk-7"}));
        assert_eq!(
            CustomProvider.idempotency_key(&with_key).as_deref(),
            Some("dk-7")
        );

        let bare = ProviderEvent::anonymous("deploy", json!({}));
        assert_eq!(CustomProvider.idempotency_key(&bare), None);
    }

    #[test]
    fn filter_by_event_name() {
        let event = ProviderEvent::anonymous("deploy", json!({}));
        assert!(CustomProvider.filter(&event, &json!({"event": "deploy"})));
        assert!(!CustomProvider.filter(&event, &json!({"event": "release"})));
        assert!(CustomProvider.filter(&event, &json!({})));
    }
}
