//! Router middleware extensions.
//!
//! Applied outside-in by the binary: recovery (panics, timeouts) wraps
//! observability (request ids, tracing spans) wraps the routes.

use std::time::Duration;

use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Recovery layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(clap::Args))]
pub struct RecoveryConfig {
    /// Per-request deadline in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "request-timeout-secs",
            env = "REQUEST_TIMEOUT_SECS",
            default_value = "30"
        )
    )]
    pub request_timeout_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}

/// Adds request ids and tracing spans.
pub trait RouterObservabilityExt {
    /// Applies request-id generation/propagation and HTTP tracing.
    fn with_observability(self) -> Self;
}

impl RouterObservabilityExt for Router {
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }
}

/// Adds panic recovery and request deadlines.
pub trait RouterRecoveryExt {
    /// Applies panic catching and the per-request timeout.
    fn with_recovery(self, config: RecoveryConfig) -> Self;
}

impl RouterRecoveryExt for Router {
    fn with_recovery(self, config: RecoveryConfig) -> Self {
        self.layer(CatchPanicLayer::new()).layer(TimeoutLayer::new(
            Duration::from_secs(config.request_timeout_secs),
        ))
    }
}
