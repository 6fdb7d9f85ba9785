//! Database error to HTTP error conversion.

use prolif_postgres::PgError;
use prolif_postgres::types::ConstraintViolation;

use super::http_error::{Error, ErrorKind};

/// Tracing target for database error conversions.
const TRACING_TARGET: &str = "prolif_server::handler::postgres";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        use prolif_postgres::types::{
            ActionGrantConstraints, ApiTokenConstraints, IntegrationConstraints,
            OrganizationConstraints, TriggerEventConstraints,
        };

        match constraint {
            ConstraintViolation::TriggerEvent(TriggerEventConstraints::TriggerDedupUnique) => {
                ErrorKind::Conflict
                    .with_message("An event with this dedup key already exists")
                    .with_resource("trigger_event")
            }
            ConstraintViolation::ApiToken(ApiTokenConstraints::TokenUnique) => {
                ErrorKind::Conflict
                    .with_message("A token with this value already exists")
                    .with_resource("api_token")
            }
            ConstraintViolation::Integration(IntegrationConstraints::ProviderConnectionUnique) => {
                ErrorKind::Conflict
                    .with_message("This connection is already registered")
                    .with_resource("integration")
            }
            ConstraintViolation::ActionGrant(ActionGrantConstraints::MaxCallsMin) => {
                ErrorKind::BadRequest
                    .with_message("Grant call budget must be at least 1")
                    .with_resource("action_grant")
            }
            ConstraintViolation::ActionGrant(ActionGrantConstraints::CallsBounds)
            | ConstraintViolation::Organization(
                OrganizationConstraints::MaxConcurrentSessionsMin,
            ) => ErrorKind::InternalServerError.into_error(),
        }
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        if let Some(constraint) = error.constraint_violation() {
            return constraint.into();
        }

        match &error {
            PgError::Timeout(_) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Database operation timed out"
                );
                ErrorKind::InternalServerError.with_message("Database temporarily unavailable")
            }
            _ => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Database operation failed"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}
