//! NATS connection configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

// Default values
const DEFAULT_NAME: &str = "proliferate-runtime";
const DEFAULT_MAX_RECONNECTS: usize = 10;
const DEFAULT_PING_INTERVAL_SECS: u64 = 30;

/// Configuration for NATS connections with sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct NatsConfig {
    /// NATS server URL (comma-separated for clustering)
    #[cfg_attr(
        feature = "config",
        arg(long, env = "NATS_URL", default_value = "nats://127.0.0.1:4222")
    )]
    pub url: String,

    /// Authentication token (optional)
    #[cfg_attr(
        feature = "config",
        arg(id = "nats_token", long = "nats-token", env = "NATS_TOKEN")
    )]
    pub token: Option<String>,

    /// Client connection name for debugging and monitoring
    #[cfg_attr(
        feature = "config",
        arg(
            id = "nats_client_name",
            long = "nats-client-name",
            env = "NATS_CLIENT_NAME"
        )
    )]
    pub name: Option<String>,

    /// Maximum time to wait for initial connection in seconds (optional)
    #[cfg_attr(
        feature = "config",
        arg(
            id = "nats_connect_timeout_secs",
            long = "nats-connect-timeout-secs",
            env = "NATS_CONNECT_TIMEOUT_SECS"
        )
    )]
    pub connect_timeout_secs: Option<u64>,

    /// Maximum number of reconnection attempts (0 = unlimited)
    #[cfg_attr(
        feature = "config",
        arg(
            id = "nats_max_reconnects",
            long = "nats-max-reconnects",
            env = "NATS_MAX_RECONNECTS"
        )
    )]
    pub max_reconnects: Option<usize>,

    /// Interval for sending ping messages in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            id = "nats_ping_interval_secs",
            long = "nats-ping-interval-secs",
            env = "NATS_PING_INTERVAL_SECS"
        )
    )]
    pub ping_interval_secs: Option<u64>,
}

impl NatsConfig {
    /// Create a new configuration with a single server URL.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            url: server_url.into(),
            token: None,
            name: None,
            connect_timeout_secs: None,
            max_reconnects: None,
            ping_interval_secs: None,
        }
    }

    /// Sets the authentication token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns the client name for monitoring.
    pub fn client_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Returns the connect timeout.
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    /// Returns the maximum reconnect attempts.
    pub fn max_reconnects(&self) -> usize {
        self.max_reconnects.unwrap_or(DEFAULT_MAX_RECONNECTS)
    }

    /// Returns the ping interval.
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs.unwrap_or(DEFAULT_PING_INTERVAL_SECS))
    }
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self::new("nats://127.0.0.1:4222")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = NatsConfig::default();
        assert_eq!(config.client_name(), DEFAULT_NAME);
        assert_eq!(config.max_reconnects(), DEFAULT_MAX_RECONNECTS);
        assert_eq!(config.ping_interval(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), None);
    }
}
