//! Error types for trigger provider operations.

use prolif_core::SchemaError;

/// Specialized [`Result`] type for trigger provider operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for trigger provider operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "trigger errors should be handled appropriately"]
pub enum Error {
    /// The request signature did not match the shared secret.
    #[error("Invalid webhook signature for provider '{provider}'")]
    InvalidSignature { provider: String },

    /// The provider requires a shared secret and none is configured.
    #[error("Provider '{provider}' requires a signing secret")]
    MissingSecret { provider: String },

    /// The trigger config failed schema validation.
    #[error(transparent)]
    Config(#[from] SchemaError),

    /// The provider does not support the requested capability.
    #[error("Provider '{provider}' does not support {capability}")]
    Unsupported {
        provider: String,
        capability: &'static str,
    },

    /// The payload could not be interpreted as provider events.
    #[error("Malformed payload for provider '{provider}': {message}")]
    MalformedPayload { provider: String, message: String },
}

impl Error {
    /// Creates an invalid-signature error.
    pub fn invalid_signature(provider: impl Into<String>) -> Self {
        Self::InvalidSignature {
            provider: provider.into(),
        }
    }

    /// Creates a missing-secret error.
    pub fn missing_secret(provider: impl Into<String>) -> Self {
        Self::MissingSecret {
            provider: provider.into(),
        }
    }

    /// Creates an unsupported-capability error.
    pub fn unsupported(provider: impl Into<String>, capability: &'static str) -> Self {
        Self::Unsupported {
            provider: provider.into(),
            capability,
        }
    }

    /// Creates a malformed-payload error.
    pub fn malformed_payload(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns whether this error denies the request at the HTTP boundary.
    ///
    /// Signature failures reject with 401 before any row is written; every
    /// other variant is recorded as a skipped event by the worker instead.
    pub fn rejects_request(&self) -> bool {
        matches!(
            self,
            Error::InvalidSignature { .. } | Error::MissingSecret { .. }
        )
    }
}
