//! Path extractor with clean rejections.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Path parameter extractor producing structured 400 responses instead of
/// axum's plain-text rejection.
#[derive(Debug, Deref, DerefMut)]
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(rejection) => Err(ErrorKind::BadRequest
                .with_message("Invalid path parameters")
                .with_context(rejection.to_string())
                .into_static()),
        }
    }
}

impl<T> aide::OperationInput for Path<T>
where
    axum::extract::Path<T>: aide::OperationInput,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        axum::extract::Path::<T>::operation_input(ctx, operation);
    }
}
