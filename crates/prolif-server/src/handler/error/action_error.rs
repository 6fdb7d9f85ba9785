//! Action engine error to HTTP error conversion.
//!
//! Status mapping per the approval contract: 404 unknown, 410 expired,
//! 409 wrong status, 403 insufficient role or non-interactive principal,
//! 502 adapter failure after approval.

use crate::service::actions::ActionError;

use super::http_error::{Error, ErrorKind};

impl From<ActionError> for Error<'static> {
    fn from(error: ActionError) -> Self {
        match error {
            ActionError::NotFound => ErrorKind::NotFound
                .with_message("Invocation not found")
                .with_resource("action_invocation")
                .into_static(),
            ActionError::Expired => ErrorKind::Gone
                .with_message("The approval window for this action has passed")
                .with_resource("action_invocation")
                .into_static(),
            ActionError::Conflict { status } => ErrorKind::Conflict
                .with_message(format!(
                    "Invocation is '{status}' and no longer accepts this decision"
                ))
                .with_resource("action_invocation")
                .into_static(),
            ActionError::Forbidden { reason } => {
                ErrorKind::Forbidden.with_message(reason).into_static()
            }
            ActionError::Adapter { message } => ErrorKind::BadGateway
                .with_message(format!("Action execution failed: {message}"))
                .into_static(),
            ActionError::Database(pg_error) => pg_error.into(),
        }
    }
}
