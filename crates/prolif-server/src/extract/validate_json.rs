//! JSON body extractor with schema validation.

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::handler::{Error, ErrorKind};

/// JSON request body extractor that also runs `validator` rules.
#[derive(Debug, Deref, DerefMut)]
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ErrorKind::BadRequest
                    .with_message("Invalid JSON request body")
                    .with_context(rejection.to_string())
                    .into_static()
            })?;

        value.validate().map_err(|errors| {
            ErrorKind::BadRequest
                .with_message("Request validation failed")
                .with_context(errors.to_string())
                .into_static()
        })?;

        Ok(ValidateJson(value))
    }
}

impl<T> aide::OperationInput for ValidateJson<T>
where
    axum::Json<T>: aide::OperationInput,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        axum::Json::<T>::operation_input(ctx, operation);
    }
}
