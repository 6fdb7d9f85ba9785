//! Trigger provider error to HTTP error conversion.

use super::http_error::{Error, ErrorKind};

impl From<prolif_trigger::Error> for Error<'static> {
    fn from(error: prolif_trigger::Error) -> Self {
        use prolif_trigger::Error as TriggerError;

        match error {
            TriggerError::InvalidSignature { .. } | TriggerError::MissingSecret { .. } => {
                ErrorKind::Unauthorized.with_message("Webhook signature verification failed")
            }
            TriggerError::Config(schema_error) => ErrorKind::BadRequest
                .with_message("Trigger config failed validation")
                .with_context(schema_error.to_string())
                .into_static(),
            TriggerError::Unsupported { capability, .. } => ErrorKind::BadRequest
                .with_message(format!("Provider does not support {capability}")),
            TriggerError::MalformedPayload { message, .. } => ErrorKind::BadRequest
                .with_message("Malformed webhook payload")
                .with_context(message)
                .into_static(),
        }
    }
}
