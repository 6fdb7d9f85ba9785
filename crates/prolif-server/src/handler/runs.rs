//! Automation run listing handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use prolif_postgres::query::{AutomationRunRepository, Pagination};

use crate::extract::{AuthState, Json, PgPool, Query};
use crate::handler::request::ListRunsQuery;
use crate::handler::response::{ErrorResponse, Runs};
use crate::handler::Result;
use crate::service::ServiceState;

/// Lists the organization's runs, newest first.
#[tracing::instrument(skip_all, fields(organization_id = %auth_state.organization_id))]
async fn list_runs(
    PgPool(mut conn): PgPool,
    auth_state: AuthState,
    Query(query): Query<ListRunsQuery>,
) -> Result<(StatusCode, Json<Runs>)> {
    let pagination = Pagination::new(query.limit.unwrap_or(50), query.offset.unwrap_or(0));

    let runs = conn
        .list_org_runs(auth_state.organization_id, query.status, pagination)
        .await?;

    let runs: Runs = runs.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(runs)))
}

fn list_runs_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List runs")
        .description("Returns the organization's automation runs, newest first.")
        .response::<200, Json<Runs>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns routes for run listings.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/runs", get_with(list_runs, list_runs_docs))
        .with_path_items(|item| item.tag("Runs"))
}
