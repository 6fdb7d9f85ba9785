//! Crate-level error type for services and workers.
//!
//! HTTP handlers use [`handler::Error`] instead; this type covers the
//! paths that never produce an HTTP response directly (workers, the
//! scheduler sync, startup wiring).
//!
//! [`handler::Error`]: crate::handler::Error

/// Specialized [`Result`] type for services and workers.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for services and workers.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// Database operation failed.
    #[error(transparent)]
    Postgres(#[from] prolif_postgres::PgError),

    /// Queue, scheduler, or bus operation failed.
    #[error(transparent)]
    Nats(#[from] prolif_nats::Error),

    /// Capability (gateway, sandbox, adapter, wake) call failed.
    #[error(transparent)]
    Capability(#[from] prolif_core::Error),

    /// Trigger provider operation failed.
    #[error(transparent)]
    Trigger(#[from] prolif_trigger::Error),

    /// External service call failed.
    #[error("External service '{service}' failed: {message}")]
    External { service: String, message: String },

    /// Invalid configuration or wiring.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates an external service error.
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::External {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns whether a queue retry might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Postgres(e) => e.is_transient(),
            Error::Nats(e) => e.is_retryable(),
            Error::Capability(e) => e.is_retryable(),
            Error::Trigger(_) => false,
            Error::External { .. } => true,
            Error::Config(_) => false,
        }
    }
}
