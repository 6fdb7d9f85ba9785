//! NATS error to HTTP error conversion.

use super::http_error::{Error, ErrorKind};

impl From<prolif_nats::Error> for Error<'static> {
    fn from(error: prolif_nats::Error) -> Self {
        use prolif_nats::Error as NatsError;

        match &error {
            NatsError::Connection(_) | NatsError::Timeout { .. } => {
                ErrorKind::InternalServerError
                    .with_message("Messaging service temporarily unavailable")
            }
            NatsError::DeliveryFailed { subject, .. } => ErrorKind::InternalServerError
                .with_message("Message delivery failed")
                .with_context(format!("Failed to deliver to {subject}"))
                .into_static(),
            NatsError::Serialization(_) => {
                ErrorKind::BadRequest.with_message("Invalid message payload")
            }
            NatsError::InvalidCron { expression, .. } => ErrorKind::BadRequest
                .with_message("Invalid cron expression")
                .with_context(expression.clone())
                .into_static(),
            NatsError::StreamError { .. }
            | NatsError::ConsumerError { .. }
            | NatsError::Operation { .. } => {
                tracing::error!(error = %error, "NATS operation failed");
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}
