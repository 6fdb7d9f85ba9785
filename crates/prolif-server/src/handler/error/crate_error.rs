//! Crate-level service error to HTTP error conversion.

use super::http_error::{Error, ErrorKind};

impl From<crate::Error> for Error<'static> {
    fn from(error: crate::Error) -> Self {
        match error {
            crate::Error::Postgres(err) => err.into(),
            crate::Error::Nats(err) => err.into(),
            crate::Error::Capability(err) => err.into(),
            crate::Error::Trigger(err) => err.into(),
            crate::Error::External { service, message } => ErrorKind::BadGateway
                .with_message(format!("Upstream service '{service}' failed"))
                .with_context(message)
                .into_static(),
            crate::Error::Config(message) => {
                tracing::error!(error = %message, "Service configuration error");
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}
