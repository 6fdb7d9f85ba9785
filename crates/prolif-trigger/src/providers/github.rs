//! GitHub App webhook deliveries.
//!
//! Event type and delivery id come from headers, not the payload; the
//! delivery GUID is the natural idempotency key since GitHub redelivers
//! with the same GUID.

use prolif_core::{FieldKind, SchemaSpec};
use serde_json::Value;

use crate::event::{ProviderEvent, WebhookDelivery};
use crate::provider::{TriggerKind, TriggerProvider};
use crate::signature;
use crate::{Error, Result};

/// Header carrying the `sha256=<hex>` HMAC of the raw body.
pub const GITHUB_SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Header naming the event kind (`push`, `issues`, `pull_request`, ...).
pub const GITHUB_EVENT_HEADER: &str = "x-github-event";

/// Header carrying the unique delivery GUID.
pub const GITHUB_DELIVERY_HEADER: &str = "x-github-delivery";

/// GitHub App webhook provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubAppProvider;

impl TriggerProvider for GithubAppProvider {
    fn id(&self) -> &'static str {
        "github-app"
    }

    fn kind(&self) -> TriggerKind {
        TriggerKind::Webhook
    }

    fn config_schema(&self) -> SchemaSpec {
        SchemaSpec::object()
            .optional("repository", FieldKind::String)
            .optional("events", FieldKind::Array)
            .optional("actions", FieldKind::Array)
    }

    fn verify(&self, delivery: &WebhookDelivery, secret: Option<&str>) -> Result<()> {
        let Some(secret) = secret else {
            return Err(Error::missing_secret(self.id()));
        };
        let signature = delivery
            .header(GITHUB_SIGNATURE_HEADER)
            .ok_or_else(|| Error::invalid_signature(self.id()))?;

        if signature::verify_github_digest(secret, &delivery.body, signature) {
            Ok(())
        } else {
            Err(Error::invalid_signature(self.id()))
        }
    }

    fn events(&self, delivery: &WebhookDelivery) -> Vec<ProviderEvent> {
        let event_type = delivery
            .header(GITHUB_EVENT_HEADER)
            .unwrap_or("unknown")
            .to_owned();

        let event = match delivery.header(GITHUB_DELIVERY_HEADER) {
            Some(guid) => ProviderEvent::new(guid, event_type, delivery.payload.clone()),
            None => ProviderEvent::anonymous(event_type, delivery.payload.clone()),
        };

        vec![event]
    }

    fn idempotency_key(&self, event: &ProviderEvent) -> Option<String> {
        event.external_event_id.clone()
    }

    fn filter(&self, event: &ProviderEvent, config: &Value) -> bool {
        if let Some(repository) = config.get("repository").and_then(Value::as_str) {
            let event_repo = event
                .payload
                .get("repository")
                .and_then(|r| r.get("full_name"))
                .and_then(Value::as_str);
            if event_repo != Some(repository) {
                return false;
            }
        }

        if let Some(events) = config.get("events").and_then(Value::as_array)
            && !events.is_empty()
        {
            let listed = events
                .iter()
                .filter_map(Value::as_str)
                .any(|e| e == event.event_type);
            if !listed {
                return false;
            }
        }

        if let Some(actions) = config.get("actions").and_then(Value::as_array)
            && !actions.is_empty()
        {
            let event_action = event.payload.get("action").and_then(Value::as_str);
            let listed = event_action
                .is_some_and(|action| actions.iter().filter_map(Value::as_str).any(|a| a == action));
            if !listed {
                return false;
            }
        }

        true
    }

    fn context(&self, event: &ProviderEvent, _config: &Value) -> Value {
        serde_json::json!({
            "provider": self.id(),
            "eventType": event.event_type,
            "deliveryId": event.external_event_id,
            "action": event.payload.get("action"),
            "repository": event.payload.get("repository").and_then(|r| r.get("full_name")),
            "sender": event.payload.get("sender").and_then(|s| s.get("login")),
            "data": event.payload,
        })
    }

    fn connection_id(&self, delivery: &WebhookDelivery) -> Option<String> {
        // GitHub routes by installation, not connection.
        delivery
            .payload
            .get("installation")
            .and_then(|i| i.get("id"))
            .and_then(Value::as_i64)
            .map(|id| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bytes::Bytes;
    use serde_json::json;

    use super::*;
    use crate::signature::hmac_sha256_hex;

    fn delivery(payload: Value, headers: &[(&str, &str)]) -> WebhookDelivery {
        WebhookDelivery {
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            body: Bytes::from(serde_json::to_vec(&payload).unwrap()),
            payload,
        }
    }

    #[test]
    fn verify_requires_sha256_prefix() {
        let payload = json!({"action": "opened"});
        let body = serde_json::to_vec(&payload).unwrap();
        let digest = hmac_sha256_hex("gh-secret", &body);

        let good = delivery(
            payload.clone(),
            &[(GITHUB_SIGNATURE_HEADER, &format!("sha256={digest}"))],
        );
        assert!(GithubAppProvider.verify(&good, Some("gh-secret")).is_ok());

        let bad = delivery(payload, &[(GITHUB_SIGNATURE_HEADER, digest.as_str())]);
        assert!(GithubAppProvider.verify(&bad, Some("gh-secret")).is_err());
    }

    #[test]
    fn delivery_guid_is_idempotency_key() {
        let delivery = delivery(
            json!({"action": "opened"}),
            &[
                (GITHUB_EVENT_HEADER, "issues"),
                (GITHUB_DELIVERY_HEADER, "guid-123"),
            ],
        );
        let events = GithubAppProvider.events(&delivery);
        assert_eq!(events[0].event_type, "issues");
        assert_eq!(
            GithubAppProvider.idempotency_key(&events[0]).as_deref(),
            Some("guid-123")
        );
    }

    #[test]
    fn filter_by_repository_and_action() {
        let event = ProviderEvent::new(
            "guid-123",
            "issues",
            json!({
                "action": "opened",
                "repository": {"full_name": "acme/api"},
            }),
        );

        assert!(GithubAppProvider.filter(&event, &json!({"repository": "acme/api"})));
        assert!(!GithubAppProvider.filter(&event, &json!({"repository": "acme/web"})));
        assert!(GithubAppProvider.filter(&event, &json!({"actions": ["opened"]})));
        assert!(!GithubAppProvider.filter(&event, &json!({"actions": ["closed"]})));
        assert!(!GithubAppProvider.filter(&event, &json!({"events": ["push"]})));
    }
}
