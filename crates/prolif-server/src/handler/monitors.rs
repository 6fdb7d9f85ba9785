//! Health monitoring handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::response::Health;
use crate::service::ServiceState;

/// Liveness probe.
async fn health() -> (StatusCode, Json<Health>) {
    (StatusCode::OK, Json(Health::ok()))
}

fn health_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health check")
        .description("Returns ok while the process is serving.")
        .response::<200, Json<Health>>()
}

/// Returns routes for health monitoring.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health", get_with(health, health_docs))
        .with_path_items(|item| item.tag("Monitors"))
}
