#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

use std::time::Duration;

// Tracing target constants for consistent logging
pub const TRACING_TARGET_CLIENT: &str = "prolif_nats::client";
pub const TRACING_TARGET_QUEUE: &str = "prolif_nats::queue";
pub const TRACING_TARGET_SCHEDULE: &str = "prolif_nats::schedule";
pub const TRACING_TARGET_BUS: &str = "prolif_nats::bus";
pub const TRACING_TARGET_CONNECTION: &str = "prolif_nats::connection";

pub mod bus;
pub mod client;
pub mod queue;
pub mod schedule;

// Re-export key types
pub use async_nats::Error as NatsError;
pub use bus::{SESSION_EVENTS_SUBJECT, SessionEvent, SessionEventBus, SessionEventStream};
pub use client::{NatsClient, NatsConfig};
pub use queue::{Job, JobKind, JobMessage, JobQueue};
pub use schedule::{ScheduleRegistration, TriggerScheduler};

/// Result type for all NATS operations in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for NATS operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// NATS client/connection errors
    #[error("NATS connection error: {0}")]
    Connection(#[from] async_nats::Error),

    /// Serialization errors when sending messages
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation timeout
    #[error("Operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// Message delivery failed
    #[error("Message delivery failed to subject '{subject}': {reason}")]
    DeliveryFailed { subject: String, reason: String },

    /// Stream operation failed
    #[error("Stream operation failed on '{stream}': {error}")]
    StreamError { stream: String, error: String },

    /// Consumer operation failed
    #[error("Consumer '{consumer}' error: {reason}")]
    ConsumerError { consumer: String, reason: String },

    /// Invalid cron expression on a schedule registration
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidCron { expression: String, reason: String },

    /// Generic operation error with context
    #[error("NATS operation failed: {operation} - {details}")]
    Operation { operation: String, details: String },
}

impl Error {
    /// Check if this error indicates a temporary failure that might succeed on retry
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::Timeout { .. } | Error::DeliveryFailed { .. }
        )
    }

    /// Get the error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Connection(_) => "connection",
            Error::Serialization(_) => "serialization",
            Error::Timeout { .. } => "timeout",
            Error::DeliveryFailed { .. } => "delivery",
            Error::StreamError { .. } => "stream",
            Error::ConsumerError { .. } => "consumer",
            Error::InvalidCron { .. } => "cron",
            Error::Operation { .. } => "operation",
        }
    }

    /// Create a delivery failed error
    pub fn delivery_failed(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeliveryFailed {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// Create a stream error
    pub fn stream_error(stream: impl Into<String>, error: impl Into<String>) -> Self {
        Self::StreamError {
            stream: stream.into(),
            error: error.into(),
        }
    }

    /// Create a consumer error
    pub fn consumer_error(consumer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConsumerError {
            consumer: consumer.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-cron error
    pub fn invalid_cron(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCron {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create an operation error with context
    pub fn operation(op: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Operation {
            operation: op.into(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let stream_err = Error::stream_error("JOBS_RUNTIME", "Stream not found");
        assert_eq!(stream_err.category(), "stream");
        assert!(!stream_err.is_retryable());

        let delivery_err = Error::delivery_failed("session-events", "no responders");
        assert_eq!(delivery_err.category(), "delivery");
        assert!(delivery_err.is_retryable());
    }
}
