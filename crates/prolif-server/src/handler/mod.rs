//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Routes are assembled with aide's [`ApiRouter`] so each handler carries
//! its OpenAPI documentation. Webhook ingress, providers, and health are
//! public; everything else authenticates via bearer tokens inside the
//! handlers.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler
//! [`ApiRouter`]: aide::axum::ApiRouter

mod actions;
mod configurations;
mod error;
mod monitors;
mod providers;
pub mod request;
pub mod response;
mod runs;
mod sessions;
mod triggers;
mod webhooks;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn fallback_handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(webhooks::routes())
        .merge(actions::routes())
        .merge(triggers::routes())
        .merge(sessions::routes())
        .merge(runs::routes())
        .merge(configurations::routes())
        .merge(providers::routes())
        .merge(monitors::routes())
        .fallback(fallback_handler)
}
