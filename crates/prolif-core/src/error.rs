//! Unified error type for capability operations.

use std::time::Duration;

/// Specialized [`Result`] type for capability operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for calls across capability seams.
#[derive(Debug, thiserror::Error)]
#[must_use = "capability errors should be handled appropriately"]
pub enum Error {
    /// Gateway RPC failed.
    #[error("Gateway operation '{operation}' failed: {message}")]
    Gateway { operation: String, message: String },

    /// Sandbox provider call failed.
    #[error("Sandbox provider '{provider}' failed: {message}")]
    Sandbox { provider: String, message: String },

    /// Action adapter execution failed.
    #[error("Adapter '{integration}' failed: {message}")]
    Adapter {
        integration: String,
        message: String,
    },

    /// Wake delivery to an async client failed.
    #[error("Wake delivery to '{client}' failed: {message}")]
    Wake { client: String, message: String },

    /// Capability call exceeded its deadline.
    #[error("Operation '{operation}' timed out after {timeout:?}")]
    Timeout {
        operation: String,
        timeout: Duration,
    },

    /// Serialization of a capability payload failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a gateway error.
    pub fn gateway(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Gateway {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a sandbox provider error.
    pub fn sandbox(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sandbox {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Creates an adapter error.
    pub fn adapter(integration: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Adapter {
            integration: integration.into(),
            message: message.into(),
        }
    }

    /// Creates a wake delivery error.
    pub fn wake(client: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Wake {
            client: client.into(),
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(operation: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout,
        }
    }

    /// Returns whether this error indicates a transient failure that might
    /// succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Gateway { .. } | Error::Sandbox { .. } | Error::Timeout { .. }
        )
    }

    /// Returns the error category for metrics and logging.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Gateway { .. } => "gateway",
            Error::Sandbox { .. } => "sandbox",
            Error::Adapter { .. } => "adapter",
            Error::Wake { .. } => "wake",
            Error::Timeout { .. } => "timeout",
            Error::Serialization(_) => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        let gateway = Error::gateway("create_session", "connection refused");
        assert_eq!(gateway.category(), "gateway");
        assert!(gateway.is_retryable());

        let adapter = Error::adapter("linear", "issue not found");
        assert_eq!(adapter.category(), "adapter");
        assert!(!adapter.is_retryable());
    }
}
