//! Session-event subscriber: wakes async clients when sessions gain work.

use prolif_core::WakeMessage;
use prolif_nats::SessionEvent;
use prolif_postgres::query::SessionRepository;
use tokio_util::sync::CancellationToken;

use crate::service::ServiceState;
use crate::Result;

/// Tracing target for the wake subscriber.
const TRACING_TARGET: &str = "prolif_server::worker::wake";

/// Subscribes to `session-events` and routes wakes to registered clients.
pub struct SessionSubscriber {
    state: ServiceState,
}

impl SessionSubscriber {
    /// Creates a subscriber.
    pub fn new(state: ServiceState) -> Self {
        Self { state }
    }

    /// Runs until cancelled; buffered frames are dropped on stop.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(target: TRACING_TARGET, "Starting session subscriber");

        let mut stream = self.state.event_bus().subscribe().await?;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!(
                        target: TRACING_TARGET,
                        "Shutdown requested, stopping session subscriber"
                    );
                    break;
                }

                event = stream.next() => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            tracing::warn!(
                                target: TRACING_TARGET,
                                "Session event subscription closed"
                            );
                            break;
                        }
                    }
                }
            }
        }

        stream.stop().await.ok();
        Ok(())
    }

    /// Routes one event; anything but a user message is ignored.
    async fn handle_event(&self, event: SessionEvent) {
        let SessionEvent::UserMessage {
            session_id,
            source,
            content,
            user_id,
        } = event
        else {
            return;
        };

        let session = async {
            let mut conn = self.state.pg_client().get_connection().await?;
            conn.find_session_by_id(session_id)
                .await
                .map_err(crate::Error::from)
        }
        .await;

        let session = match session {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    session_id = %session_id,
                    "Session gone; dropping wake"
                );
                return;
            }
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    session_id = %session_id,
                    error = %err,
                    "Session lookup failed; dropping wake"
                );
                return;
            }
        };

        // Only async clients pull; web sessions see updates directly.
        let Some(client_source) = session.client_source().filter(|source| source.is_async())
        else {
            return;
        };

        // Do not echo a message back to the client it came from.
        if client_source == source {
            return;
        }

        let Some(client) = self.state.services().wake_client(client_source) else {
            tracing::warn!(
                target: TRACING_TARGET,
                session_id = %session_id,
                client_type = %client_source,
                "No wake client registered; dropping"
            );
            return;
        };

        let wake = client
            .wake(
                session_id,
                &session.client_metadata,
                source,
                WakeMessage { content, user_id },
            )
            .await;

        match wake {
            Ok(()) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    session_id = %session_id,
                    client_type = %client_source,
                    "Client woken"
                );
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    session_id = %session_id,
                    client_type = %client_source,
                    error = %err,
                    "Wake delivery failed"
                );
            }
        }
    }
}

impl std::fmt::Debug for SessionSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSubscriber").finish_non_exhaustive()
    }
}
