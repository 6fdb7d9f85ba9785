//! Runtime service configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Runtime knobs beyond the store configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RuntimeConfig {
    /// HMAC key for `/webhooks/nango` verification.
    #[cfg_attr(
        feature = "config",
        arg(long = "nango-secret-key", env = "NANGO_SECRET_KEY")
    )]
    pub nango_secret_key: Option<String>,

    /// HMAC key for `/webhooks/github-app` verification.
    #[cfg_attr(
        feature = "config",
        arg(long = "github-app-webhook-secret", env = "GITHUB_APP_WEBHOOK_SECRET")
    )]
    pub github_app_webhook_secret: Option<String>,

    /// Token used to clone private repositories into snapshots.
    #[cfg_attr(feature = "config", arg(long = "github-token", env = "GITHUB_TOKEN"))]
    pub github_token: Option<String>,

    /// Whether the billing gate is active; false bypasses all checks.
    #[cfg_attr(
        feature = "config",
        arg(long = "billing-enabled", env = "BILLING_ENABLED", default_value = "true")
    )]
    pub billing_enabled: bool,

    /// Minimum shadow-balance credits required to start work.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "min-credits-to-start",
            env = "MIN_CREDITS_TO_START",
            default_value = "10"
        )
    )]
    pub min_credits_to_start: i64,

    /// Days terminal inbox rows are retained before GC.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "inbox-retention-days",
            env = "INBOX_RETENTION_DAYS",
            default_value = "7"
        )
    )]
    pub inbox_retention_days: u32,

    /// Bearer token authenticating the service principal.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "service-auth-token",
            env = "SERVICE_TO_SERVICE_AUTH_TOKEN",
            hide_env_values = true
        )
    )]
    pub service_auth_token: Option<String>,

    /// Base URL of the session gateway.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "gateway-url",
            env = "GATEWAY_URL",
            default_value = "http://127.0.0.1:8091/"
        )
    )]
    pub gateway_url: String,

    /// Base URL of the sandbox provider service.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "sandbox-api-url",
            env = "SANDBOX_API_URL",
            default_value = "http://127.0.0.1:8092/"
        )
    )]
    pub sandbox_api_url: String,

    /// Concurrent jobs one worker process executes.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "worker-concurrency",
            env = "WORKER_CONCURRENCY",
            default_value = "8"
        )
    )]
    pub worker_concurrency: usize,
}

impl RuntimeConfig {
    /// Returns the inbox retention window as a duration.
    pub fn inbox_retention(&self) -> Duration {
        Duration::from_secs(u64::from(self.inbox_retention_days) * 24 * 60 * 60)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            nango_secret_key: None,
            github_app_webhook_secret: None,
            github_token: None,
            billing_enabled: true,
            min_credits_to_start: 10,
            inbox_retention_days: 7,
            service_auth_token: None,
            gateway_url: "http://127.0.0.1:8091/".to_owned(),
            sandbox_api_url: "http://127.0.0.1:8092/".to_owned(),
            worker_concurrency: 8,
        }
    }
}

/// Complete service configuration: stores plus runtime knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ServiceConfig {
    /// Relational store configuration.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(flatten)]
    pub postgres: prolif_postgres::PgConfig,

    /// Queue and pub/sub backend configuration.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(flatten)]
    pub nats: prolif_nats::NatsConfig,

    /// Runtime knobs.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(flatten)]
    pub runtime: RuntimeConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_window() {
        let config = RuntimeConfig::default();
        assert_eq!(config.inbox_retention(), Duration::from_secs(7 * 86_400));
    }
}
