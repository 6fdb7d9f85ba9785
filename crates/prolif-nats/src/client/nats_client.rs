//! NATS client wrapper and connection management.
//!
//! The wrapper is cheaply cloneable and thread-safe; clones share one
//! multiplexed TCP connection with automatic reconnection.

use std::sync::Arc;
use std::time::Duration;

use async_nats::{Client, ConnectOptions, jetstream};
use bytes::Bytes;
use tokio::time::timeout;

use super::nats_config::NatsConfig;
use crate::{Error, Result, TRACING_TARGET_CLIENT, TRACING_TARGET_CONNECTION};

/// NATS client wrapper with connection management.
#[derive(Debug, Clone)]
pub struct NatsClient {
    inner: Arc<NatsClientInner>,
}

#[derive(Debug)]
struct NatsClientInner {
    client: Client,
    jetstream: jetstream::Context,
    config: NatsConfig,
}

impl NatsClient {
    /// Connects to NATS with the given configuration.
    pub async fn connect(config: NatsConfig) -> Result<Self> {
        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            url = %config.url,
            client_name = %config.client_name(),
            "Connecting to NATS"
        );

        let mut options = ConnectOptions::new()
            .name(config.client_name())
            .max_reconnects(config.max_reconnects())
            .ping_interval(config.ping_interval());

        if let Some(token) = &config.token {
            options = options.token(token.clone());
        }

        if let Some(connect_timeout) = config.connect_timeout() {
            options = options.connection_timeout(connect_timeout);
        }

        let client = options
            .connect(&config.url)
            .await
            .map_err(|e| Error::operation("connect", e.to_string()))?;

        let jetstream = jetstream::new(client.clone());

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            client_name = %config.client_name(),
            "NATS client connected"
        );

        Ok(Self {
            inner: Arc::new(NatsClientInner {
                client,
                jetstream,
                config,
            }),
        })
    }

    /// Returns the underlying NATS client.
    #[inline]
    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    /// Returns the JetStream context.
    #[inline]
    pub fn jetstream(&self) -> &jetstream::Context {
        &self.inner.jetstream
    }

    /// Returns the configuration used by this client.
    #[inline]
    pub fn config(&self) -> &NatsConfig {
        &self.inner.config
    }

    /// Measures round-trip time to the server.
    pub async fn ping(&self) -> Result<Duration> {
        let start = std::time::Instant::now();
        let deadline = Duration::from_secs(5);

        timeout(deadline, self.inner.client.flush())
            .await
            .map_err(|_| Error::Timeout { timeout: deadline })?
            .map_err(|e| Error::operation("ping", e.to_string()))?;

        Ok(start.elapsed())
    }

    /// Returns whether the client is currently connected.
    pub fn is_connected(&self) -> bool {
        self.inner.client.connection_state() == async_nats::connection::State::Connected
    }

    /// Publishes a raw payload to a core NATS subject.
    pub async fn publish(&self, subject: &str, payload: impl Into<Bytes>) -> Result<()> {
        self.inner
            .client
            .publish(subject.to_owned(), payload.into())
            .await
            .map_err(|e| Error::delivery_failed(subject, e.to_string()))
    }

    /// Subscribes to a core NATS subject.
    pub async fn subscribe(&self, subject: &str) -> Result<async_nats::Subscriber> {
        self.inner
            .client
            .subscribe(subject.to_owned())
            .await
            .map_err(|e| Error::operation("subscribe", e.to_string()))
    }

    /// Flushes buffered outgoing messages.
    pub async fn flush(&self) -> Result<()> {
        self.inner
            .client
            .flush()
            .await
            .map_err(|e| Error::operation("flush", e.to_string()))
    }
}
