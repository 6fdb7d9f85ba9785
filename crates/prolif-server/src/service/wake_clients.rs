//! Wakeable client implementations for async clients.
//!
//! Slack and CLI sessions register a callback URL in their client
//! metadata; a wake is one POST to it. Wakes are idempotent per session:
//! a second wake arriving while one is in flight is a no-op, the woken
//! client pulls everything new anyway.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use prolif_core::{ClientSource, WakeMessage, WakeableClient};
use uuid::Uuid;

/// Tracing target for wake deliveries.
const TRACING_TARGET: &str = "prolif_server::service::wake";

/// Metadata key carrying the client's wake callback URL.
const CALLBACK_URL_KEY: &str = "callback_url";

/// Callback-URL wake client, one instance per async client type.
#[derive(Clone)]
pub struct CallbackWakeClient {
    client_type: ClientSource,
    http: reqwest::Client,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl CallbackWakeClient {
    /// Creates a wake client for one client type.
    pub fn new(client_type: ClientSource) -> Self {
        Self {
            client_type,
            http: reqwest::Client::new(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn begin(&self, session_id: Uuid) -> bool {
        self.in_flight
            .lock()
            .expect("wake lock poisoned")
            .insert(session_id)
    }

    fn finish(&self, session_id: Uuid) {
        self.in_flight
            .lock()
            .expect("wake lock poisoned")
            .remove(&session_id);
    }
}

#[async_trait::async_trait]
impl WakeableClient for CallbackWakeClient {
    fn client_type(&self) -> ClientSource {
        self.client_type
    }

    async fn wake(
        &self,
        session_id: Uuid,
        client_metadata: &serde_json::Value,
        source: ClientSource,
        message: WakeMessage,
    ) -> prolif_core::Result<()> {
        let Some(callback_url) = client_metadata
            .get(CALLBACK_URL_KEY)
            .and_then(|v| v.as_str())
        else {
            return Err(prolif_core::Error::wake(
                self.client_type.as_str(),
                "session metadata carries no callback_url",
            ));
        };

        // Idempotency: one wake in flight per session.
        if !self.begin(session_id) {
            tracing::debug!(
                target: TRACING_TARGET,
                session_id = %session_id,
                "Wake already in flight; dropping"
            );
            return Ok(());
        }

        let result = self
            .http
            .post(callback_url)
            .json(&serde_json::json!({
                "sessionId": session_id,
                "source": source,
                "content": message.content,
                "userId": message.user_id,
            }))
            .send()
            .await;

        self.finish(session_id);

        let response =
            result.map_err(|e| prolif_core::Error::wake(self.client_type.as_str(), e.to_string()))?;

        if !response.status().is_success() {
            return Err(prolif_core::Error::wake(
                self.client_type.as_str(),
                format!("callback returned {}", response.status()),
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET,
            session_id = %session_id,
            client_type = %self.client_type,
            "Client woken"
        );
        Ok(())
    }
}

impl std::fmt::Debug for CallbackWakeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackWakeClient")
            .field("client_type", &self.client_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_guard_is_per_session() {
        let client = CallbackWakeClient::new(ClientSource::Slack);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(client.begin(a));
        assert!(!client.begin(a));
        assert!(client.begin(b));

        client.finish(a);
        assert!(client.begin(a));
    }
}
