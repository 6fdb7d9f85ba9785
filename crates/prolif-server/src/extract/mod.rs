//! Request extractors for handlers.

mod auth;
mod path;
mod pg_connection;
mod query;
mod validate_json;

pub use auth::{AuthState, ServiceAuthToken};
/// JSON response body; requests use [`ValidateJson`].
pub use axum::Json;
pub use path::Path;
pub use pg_connection::PgPool;
pub use query::Query;
pub use validate_json::ValidateJson;
