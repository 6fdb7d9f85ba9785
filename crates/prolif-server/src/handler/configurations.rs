//! Configuration snapshot handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use prolif_nats::{Job, JobKind, JobQueue};
use prolif_postgres::query::ConfigurationRepository;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::extract::{AuthState, Json, Path, PgPool, ValidateJson};
use crate::handler::request::ConfigurationPathParams;
use crate::handler::response::ErrorResponse;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for configuration handlers.
const TRACING_TARGET: &str = "prolif_server::handler::configurations";

/// Request payload for kicking a snapshot build.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, validator::Validate)]
#[serde(rename_all = "camelCase")]
struct KickSnapshot {
    /// Rebuild even when a usable snapshot exists.
    #[serde(default)]
    force: bool,
}

/// Acknowledgement for an enqueued snapshot build.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct SnapshotQueued {
    configuration_id: uuid::Uuid,
    queued: bool,
}

/// Enqueues an idempotent snapshot build for a configuration.
#[tracing::instrument(
    skip_all,
    fields(configuration_id = %path_params.configuration_id)
)]
async fn kick_snapshot(
    PgPool(mut conn): PgPool,
    State(queue): State<JobQueue>,
    auth_state: AuthState,
    Path(path_params): Path<ConfigurationPathParams>,
    ValidateJson(request): ValidateJson<KickSnapshot>,
) -> Result<(StatusCode, Json<SnapshotQueued>)> {
    let Some(configuration) = conn
        .find_configuration_by_id(path_params.configuration_id)
        .await?
    else {
        return Err(ErrorKind::NotFound
            .with_message("Configuration not found")
            .with_resource("configuration")
            .into_static());
    };

    auth_state.authorize_org(configuration.organization_id)?;

    let job = Job::new(JobKind::BuildSnapshot {
        configuration_id: configuration.id,
        force: request.force,
    });
    queue.submit(&job).await?;

    tracing::info!(
        target: TRACING_TARGET,
        force = request.force,
        "Snapshot build enqueued"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(SnapshotQueued {
            configuration_id: configuration.id,
            queued: true,
        }),
    ))
}

fn kick_snapshot_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Build configuration snapshot")
        .description("Enqueues an idempotent snapshot build; force rebuilds an existing snapshot.")
        .response::<202, Json<SnapshotQueued>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for configuration snapshots.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/configurations/{configuration_id}/snapshot",
            post_with(kick_snapshot, kick_snapshot_docs),
        )
        .with_path_items(|item| item.tag("Configurations"))
}
