//! Capability error to HTTP error conversion.
//!
//! Gateway, sandbox, adapter, and wake failures surface as gateway-class
//! errors: the runtime itself is healthy, the collaborator is not.

use super::http_error::{Error, ErrorKind};

/// Tracing target for capability error conversions.
const TRACING_TARGET: &str = "prolif_server::handler::capability";

impl From<prolif_core::Error> for Error<'static> {
    fn from(error: prolif_core::Error) -> Self {
        use prolif_core::Error as CapabilityError;

        tracing::warn!(
            target: TRACING_TARGET,
            error = %error,
            category = error.category(),
            "Capability call failed"
        );

        match error {
            CapabilityError::Gateway { message, .. } => ErrorKind::BadGateway
                .with_message("Session gateway unavailable")
                .with_context(message)
                .into_static(),
            CapabilityError::Sandbox { message, .. } => ErrorKind::BadGateway
                .with_message("Sandbox provider unavailable")
                .with_context(message)
                .into_static(),
            CapabilityError::Adapter {
                integration,
                message,
            } => ErrorKind::BadGateway
                .with_message(format!("Action execution failed: {message}"))
                .with_resource(integration)
                .into_static(),
            CapabilityError::Wake { message, .. } => ErrorKind::BadGateway
                .with_message("Client wake delivery failed")
                .with_context(message)
                .into_static(),
            CapabilityError::Timeout { .. } => {
                ErrorKind::BadGateway.with_message("Upstream call timed out")
            }
            CapabilityError::Serialization(_) => ErrorKind::InternalServerError.into_error(),
        }
    }
}
