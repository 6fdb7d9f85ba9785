//! Query-string extractor with clean rejections.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Query-string extractor producing structured 400 responses.
#[derive(Debug, Deref, DerefMut)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => Err(ErrorKind::BadRequest
                .with_message("Invalid query parameters")
                .with_context(rejection.to_string())
                .into_static()),
        }
    }
}

impl<T> aide::OperationInput for Query<T>
where
    axum::extract::Query<T>: aide::OperationInput,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        axum::extract::Query::<T>::operation_input(ctx, operation);
    }
}
