//! Session event frames and the pub/sub bus carrying them.
//!
//! The bus is deliberately asynchronous: it decouples client registries
//! from the session update path and crosses process boundaries in
//! production. Delivery is at-least-once with no ordering guarantee; the
//! client's own message log is the ordering authority.

use futures::StreamExt;
use prolif_core::ClientSource;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::NatsClient;
use crate::{Result, TRACING_TARGET_BUS};

/// The process-wide channel session events travel on.
pub const SESSION_EVENTS_SUBJECT: &str = "session-events";

/// One frame on the session event channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A user message arrived on a session from some client.
    UserMessage {
        session_id: Uuid,
        /// The client the message arrived from.
        source: ClientSource,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        user_id: Option<Uuid>,
    },

    /// A session reached a terminal state.
    SessionClosed { session_id: Uuid },
}

impl SessionEvent {
    /// Returns the session this event belongs to.
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionEvent::UserMessage { session_id, .. } => *session_id,
            SessionEvent::SessionClosed { session_id } => *session_id,
        }
    }
}

/// Publisher/subscriber handle for the session event channel.
#[derive(Debug, Clone)]
pub struct SessionEventBus {
    client: NatsClient,
}

impl SessionEventBus {
    /// Creates a bus handle over an existing client.
    pub fn new(client: NatsClient) -> Self {
        Self { client }
    }

    /// Publishes an event to every subscriber.
    pub async fn publish(&self, event: &SessionEvent) -> Result<()> {
        let payload = serde_json::to_vec(event)?;
        self.client.publish(SESSION_EVENTS_SUBJECT, payload).await?;

        tracing::debug!(
            target: TRACING_TARGET_BUS,
            session_id = %event.session_id(),
            "Published session event"
        );
        Ok(())
    }

    /// Subscribes to the channel.
    pub async fn subscribe(&self) -> Result<SessionEventStream> {
        let subscriber = self.client.subscribe(SESSION_EVENTS_SUBJECT).await?;

        tracing::info!(
            target: TRACING_TARGET_BUS,
            subject = SESSION_EVENTS_SUBJECT,
            "Subscribed to session events"
        );

        Ok(SessionEventStream { subscriber })
    }
}

/// A live subscription yielding decoded session events.
pub struct SessionEventStream {
    subscriber: async_nats::Subscriber,
}

impl SessionEventStream {
    /// Awaits the next decodable event.
    ///
    /// Malformed frames are logged and skipped; `None` means the
    /// subscription closed.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            let message = self.subscriber.next().await?;

            match serde_json::from_slice::<SessionEvent>(&message.payload) {
                Ok(event) => return Some(event),
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET_BUS,
                        error = %err,
                        "Dropping malformed session event frame"
                    );
                }
            }
        }
    }

    /// Unsubscribes, dropping any buffered frames.
    pub async fn stop(mut self) -> Result<()> {
        self.subscriber
            .unsubscribe()
            .await
            .map_err(|e| crate::Error::operation("unsubscribe", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_frame_shape() {
        let event = SessionEvent::UserMessage {
            session_id: Uuid::nil(),
            source: ClientSource::Web,
            content: "ship it".to_owned(),
            user_id: None,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "user_message");
        assert_eq!(json["source"], "web");
        assert!(json.get("user_id").is_none());

        let decoded: SessionEvent = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let json = serde_json::json!({
            "type": "user_message",
            "session_id": Uuid::nil(),
            "source": "slack",
            "content": "hello",
            "reply_to": "ignored",
        });

        let decoded: SessionEvent = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.session_id(), Uuid::nil());
    }
}
