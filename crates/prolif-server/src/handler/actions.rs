//! Action approval handlers.
//!
//! The approve→execute pair is atomic from the caller's perspective: one
//! call yields a terminal invocation state.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use prolif_postgres::query::{ActionInvocationRepository, SessionRepository};

use crate::extract::{AuthState, Json, Path, PgPool, Query, ValidateJson};
use crate::handler::request::{
    ApproveAction, InvocationPathParams, ListInvocationsQuery, SessionPathParams,
};
use crate::handler::response::{ErrorResponse, Invocation, Invocations};
use crate::handler::{ErrorKind, Result};
use crate::service::actions::{ActionEngine, Approver, GrantRequest};
use crate::service::ServiceState;

/// Tracing target for action handlers.
const TRACING_TARGET: &str = "prolif_server::handler::actions";

/// Approves a pending invocation and executes it.
///
/// Requires an interactive owner or admin principal. With
/// `mode: "grant"`, also records a reusable grant for the scope.
#[tracing::instrument(
    skip_all,
    fields(
        account_id = %auth_state.account_id,
        session_id = %path_params.session_id,
        invocation_id = %path_params.invocation_id,
    )
)]
async fn approve_invocation(
    PgPool(mut conn): PgPool,
    State(engine): State<ActionEngine>,
    auth_state: AuthState,
    Path(path_params): Path<InvocationPathParams>,
    ValidateJson(request): ValidateJson<ApproveAction>,
) -> Result<(StatusCode, Json<Invocation>)> {
    tracing::debug!(target: TRACING_TARGET, "Approving invocation");

    authorize_session_org(&mut conn, &auth_state, path_params.session_id).await?;

    let approver = Approver {
        account_id: auth_state.account_id,
        role: auth_state.role,
        interactive: auth_state.is_interactive(),
    };

    let grant = request.grant_request().map(|spec| GrantRequest {
        scope: spec.scope.clone(),
        max_calls: spec.max_calls,
    });

    let invocation = engine
        .approve(
            &mut conn,
            path_params.session_id,
            path_params.invocation_id,
            approver,
            grant,
        )
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        status = %invocation.status,
        "Invocation decided"
    );

    Ok((StatusCode::OK, Json(invocation.into())))
}

fn approve_invocation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Approve action")
        .description(
            "Approves a pending invocation and executes it to a terminal state. \
             Grant mode records a reusable approval for the scope.",
        )
        .response::<200, Json<Invocation>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
        .response::<410, Json<ErrorResponse>>()
        .response::<502, Json<ErrorResponse>>()
}

/// Denies a pending invocation.
#[tracing::instrument(
    skip_all,
    fields(
        account_id = %auth_state.account_id,
        session_id = %path_params.session_id,
        invocation_id = %path_params.invocation_id,
    )
)]
async fn deny_invocation(
    PgPool(mut conn): PgPool,
    State(engine): State<ActionEngine>,
    auth_state: AuthState,
    Path(path_params): Path<InvocationPathParams>,
) -> Result<(StatusCode, Json<Invocation>)> {
    tracing::debug!(target: TRACING_TARGET, "Denying invocation");

    authorize_session_org(&mut conn, &auth_state, path_params.session_id).await?;

    let approver = Approver {
        account_id: auth_state.account_id,
        role: auth_state.role,
        interactive: auth_state.is_interactive(),
    };

    let invocation = engine
        .deny(
            &mut conn,
            path_params.session_id,
            path_params.invocation_id,
            approver,
        )
        .await?;

    tracing::info!(target: TRACING_TARGET, "Invocation denied");

    Ok((StatusCode::OK, Json(invocation.into())))
}

fn deny_invocation_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Deny action")
        .description("Denies a pending invocation. Denials are terminal.")
        .response::<200, Json<Invocation>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
        .response::<410, Json<ErrorResponse>>()
}

/// Lists a session's invocations, newest first.
#[tracing::instrument(
    skip_all,
    fields(
        account_id = %auth_state.account_id,
        session_id = %path_params.session_id,
    )
)]
async fn list_invocations(
    PgPool(mut conn): PgPool,
    auth_state: AuthState,
    Path(path_params): Path<SessionPathParams>,
    Query(query): Query<ListInvocationsQuery>,
) -> Result<(StatusCode, Json<Invocations>)> {
    authorize_session_org(&mut conn, &auth_state, path_params.session_id).await?;

    let pagination = prolif_postgres::query::Pagination::new(
        query.limit.unwrap_or(50),
        query.offset.unwrap_or(0),
    );

    let invocations = conn
        .list_session_invocations(path_params.session_id, query.status, pagination)
        .await?;

    let invocations: Invocations = invocations.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(invocations)))
}

fn list_invocations_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List invocations")
        .description("Returns a session's action invocations, newest first.")
        .response::<200, Json<Invocations>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Resolves the session and checks the caller's organization scope.
async fn authorize_session_org(
    conn: &mut prolif_postgres::PgConnection,
    auth_state: &AuthState,
    session_id: uuid::Uuid,
) -> Result<()> {
    let Some(session) = conn.find_session_by_id(session_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message("Session not found")
            .with_resource("session")
            .into_static());
    };

    auth_state.authorize_org(session.organization_id)
}

/// Returns routes for action approvals.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/actions/{session_id}/invocations",
            get_with(list_invocations, list_invocations_docs),
        )
        .api_route(
            "/actions/{session_id}/invocations/{invocation_id}/approve",
            post_with(approve_invocation, approve_invocation_docs),
        )
        .api_route(
            "/actions/{session_id}/invocations/{invocation_id}/deny",
            post_with(deny_invocation, deny_invocation_docs),
        )
        .with_path_items(|item| item.tag("Actions"))
}
