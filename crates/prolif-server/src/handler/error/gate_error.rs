//! Billing gate denial to HTTP error conversion.

use crate::service::gate::GateDeny;

use super::http_error::{Error, ErrorKind};

impl From<GateDeny> for Error<'static> {
    fn from(deny: GateDeny) -> Self {
        let mut error = ErrorKind::Forbidden
            .with_message(deny.message)
            .with_code(deny.code.as_str());

        if let Some(action) = deny.action {
            error = error.with_context(format!("action: {}", action.as_str()));
        }

        error.into_static()
    }
}
