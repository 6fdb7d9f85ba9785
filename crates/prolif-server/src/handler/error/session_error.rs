//! Session lifecycle error to HTTP error conversion.

use crate::service::sessions::SessionError;

use super::http_error::{Error, ErrorKind};

impl From<SessionError> for Error<'static> {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Gate(deny) => deny.into(),
            SessionError::Gateway(err) => err.into(),
            SessionError::NotFound => ErrorKind::NotFound
                .with_message("Session not found")
                .with_resource("session")
                .into_static(),
            SessionError::InvalidState { status } => ErrorKind::Conflict
                .with_message(format!("Session is '{status}' and cannot take this operation"))
                .with_resource("session")
                .into_static(),
            SessionError::Database(err) => err.into(),
        }
    }
}
