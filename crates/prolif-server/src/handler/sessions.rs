//! Session registry handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use prolif_postgres::query::{Pagination, SessionRepository};

use crate::extract::{AuthState, Json, Path, PgPool, Query, ValidateJson};
use crate::handler::request::{
    ListSessionsQuery, PauseSession, SessionPathParams, StartSession, UpdateSessionRegistry,
};
use crate::handler::response::{ErrorResponse, Session, Sessions};
use crate::handler::{ErrorKind, Result};
use crate::service::sessions::{SessionService, StartSessionInput};
use crate::service::ServiceState;

/// Tracing target for session handlers.
const TRACING_TARGET: &str = "prolif_server::handler::sessions";

/// Starts a new session for the caller's organization.
///
/// Passes through the billing admission gate; denials surface as typed
/// 403 codes.
#[tracing::instrument(
    skip_all,
    fields(
        account_id = %auth_state.account_id,
        organization_id = %auth_state.organization_id,
    )
)]
async fn start_session(
    PgPool(mut conn): PgPool,
    State(sessions): State<SessionService>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<StartSession>,
) -> Result<(StatusCode, Json<Session>)> {
    tracing::debug!(target: TRACING_TARGET, "Starting session");

    let session = sessions
        .start(
            &mut conn,
            StartSessionInput {
                organization_id: auth_state.organization_id,
                configuration_id: request.configuration_id,
                client_type: request.client_type,
                client_metadata: request.client_metadata,
                prompt: request.prompt,
                automation_id: None,
                trigger_event_id: None,
                sandbox_provider: request.sandbox_provider,
            },
        )
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        session_id = %session.id,
        "Session started"
    );

    Ok((StatusCode::CREATED, Json(session.into())))
}

fn start_session_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Start session")
        .description("Starts a session after passing the billing admission gate.")
        .response::<201, Json<Session>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<502, Json<ErrorResponse>>()
}

/// Lists the organization's sessions.
#[tracing::instrument(skip_all, fields(organization_id = %auth_state.organization_id))]
async fn list_sessions(
    PgPool(mut conn): PgPool,
    auth_state: AuthState,
    Query(query): Query<ListSessionsQuery>,
) -> Result<(StatusCode, Json<Sessions>)> {
    let pagination = Pagination::new(query.limit.unwrap_or(50), query.offset.unwrap_or(0));

    let sessions = conn
        .list_org_sessions(auth_state.organization_id, query.status, pagination)
        .await?;

    let sessions: Sessions = sessions.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(sessions)))
}

fn list_sessions_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List sessions")
        .response::<200, Json<Sessions>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Retrieves one session.
#[tracing::instrument(skip_all, fields(session_id = %path_params.session_id))]
async fn read_session(
    PgPool(mut conn): PgPool,
    auth_state: AuthState,
    Path(path_params): Path<SessionPathParams>,
) -> Result<(StatusCode, Json<Session>)> {
    let session = find_org_session(&mut conn, &auth_state, path_params.session_id).await?;
    Ok((StatusCode::OK, Json(session.into())))
}

fn read_session_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get session")
        .response::<200, Json<Session>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Resumes a paused session through the gate.
#[tracing::instrument(skip_all, fields(session_id = %path_params.session_id))]
async fn resume_session(
    PgPool(mut conn): PgPool,
    State(sessions): State<SessionService>,
    auth_state: AuthState,
    Path(path_params): Path<SessionPathParams>,
) -> Result<(StatusCode, Json<Session>)> {
    find_org_session(&mut conn, &auth_state, path_params.session_id).await?;

    let session = sessions.resume(&mut conn, path_params.session_id).await?;

    tracing::info!(target: TRACING_TARGET, "Session resume requested");

    Ok((StatusCode::OK, Json(session.into())))
}

fn resume_session_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Resume session")
        .description("Resumes a paused session after passing the billing admission gate.")
        .response::<200, Json<Session>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Pauses a running session, releasing its sandbox.
#[tracing::instrument(skip_all, fields(session_id = %path_params.session_id))]
async fn pause_session(
    PgPool(mut conn): PgPool,
    State(sessions): State<SessionService>,
    auth_state: AuthState,
    Path(path_params): Path<SessionPathParams>,
    ValidateJson(request): ValidateJson<PauseSession>,
) -> Result<(StatusCode, Json<Session>)> {
    find_org_session(&mut conn, &auth_state, path_params.session_id).await?;

    let session = sessions
        .pause(&mut conn, path_params.session_id, request.reason)
        .await?;

    tracing::info!(target: TRACING_TARGET, "Session paused");

    Ok((StatusCode::OK, Json(session.into())))
}

fn pause_session_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Pause session")
        .response::<200, Json<Session>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Gateway-originated registry update (service principal only).
///
/// The gateway reports sandbox allocation and lifecycle transitions; the
/// registry keeps the sandbox/status coupling by routing sandbox-holding
/// statuses through activation and the rest through release.
#[tracing::instrument(skip_all, fields(session_id = %path_params.session_id))]
async fn update_session_registry(
    PgPool(mut conn): PgPool,
    auth_state: AuthState,
    Path(path_params): Path<SessionPathParams>,
    ValidateJson(request): ValidateJson<UpdateSessionRegistry>,
) -> Result<(StatusCode, Json<Session>)> {
    if auth_state.kind != prolif_postgres::types::ApiTokenKind::Service {
        return Err(ErrorKind::Forbidden
            .with_message("Registry updates are reserved for the gateway")
            .into_static());
    }

    let session = if request.status.holds_sandbox() {
        let Some(sandbox_id) = request.sandbox_id else {
            return Err(ErrorKind::BadRequest
                .with_message("Sandbox-holding statuses require a sandbox id")
                .into_static());
        };
        conn.activate_session(path_params.session_id, request.status, sandbox_id)
            .await?
    } else {
        conn.release_session(path_params.session_id, request.status, request.pause_reason)
            .await?
    };

    tracing::info!(
        target: TRACING_TARGET,
        status = %session.status,
        "Session registry updated"
    );

    Ok((StatusCode::OK, Json(session.into())))
}

fn update_session_registry_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update session registry")
        .description("Gateway-only: records sandbox allocation and lifecycle transitions.")
        .response::<200, Json<Session>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Loads a session scoped to the caller's organization.
async fn find_org_session(
    conn: &mut prolif_postgres::PgConnection,
    auth_state: &AuthState,
    session_id: uuid::Uuid,
) -> Result<prolif_postgres::model::Session> {
    let Some(session) = conn.find_session_by_id(session_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message("Session not found")
            .with_resource("session")
            .into_static());
    };

    auth_state.authorize_org(session.organization_id)?;
    Ok(session)
}

/// Returns routes for the session registry.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/sessions",
            post_with(start_session, start_session_docs)
                .get_with(list_sessions, list_sessions_docs),
        )
        .api_route(
            "/sessions/{session_id}",
            get_with(read_session, read_session_docs)
                .patch_with(update_session_registry, update_session_registry_docs),
        )
        .api_route(
            "/sessions/{session_id}/resume",
            post_with(resume_session, resume_session_docs),
        )
        .api_route(
            "/sessions/{session_id}/pause",
            post_with(pause_session, pause_session_docs),
        )
        .with_path_items(|item| item.tag("Sessions"))
}
