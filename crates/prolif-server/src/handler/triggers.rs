//! Trigger management handlers.
//!
//! Enable/disable drives the scheduler registration atomically with the
//! row update: an enabled repeatable trigger always has a live
//! registration, a disabled one never does.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use prolif_postgres::model;
use prolif_postgres::query::{Pagination, TriggerEventRepository, TriggerRepository};
use prolif_trigger::ProviderRegistry;

use crate::extract::{AuthState, Json, Path, PgPool, Query, ValidateJson};
use crate::handler::request::{
    CreateTrigger, ListEventsQuery, TriggerPathParams, UpdateTrigger as UpdateTriggerRequest,
};
use crate::handler::response::{ErrorResponse, Trigger, TriggerEvents, Triggers};
use crate::handler::{ErrorKind, Result};
use crate::service::schedule::ScheduleSync;
use crate::service::ServiceState;

/// Tracing target for trigger handlers.
const TRACING_TARGET: &str = "prolif_server::handler::triggers";

/// Registers a new trigger.
///
/// The config is validated against the provider's schema; enabled
/// repeatable triggers are registered with the scheduler before the
/// response returns.
#[tracing::instrument(
    skip_all,
    fields(
        account_id = %auth_state.account_id,
        organization_id = %auth_state.organization_id,
    )
)]
async fn create_trigger(
    PgPool(mut conn): PgPool,
    State(registry): State<ProviderRegistry>,
    State(schedule_sync): State<ScheduleSync>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<CreateTrigger>,
) -> Result<(StatusCode, Json<Trigger>)> {
    tracing::debug!(target: TRACING_TARGET, provider = %request.provider, "Creating trigger");

    let Some(provider) = registry.get(&request.provider) else {
        return Err(ErrorKind::BadRequest
            .with_message("Unknown trigger provider")
            .with_resource("provider")
            .into_static());
    };

    let config = provider
        .config_schema()
        .safe_parse(&request.config)
        .map_err(prolif_trigger::Error::Config)?;

    let new_trigger = request.into_model(auth_state.organization_id, config);
    let trigger = conn.create_trigger(new_trigger).await?;

    if trigger.needs_schedule() {
        schedule_sync.sync_trigger(&mut conn, &trigger).await?;
    }

    tracing::info!(
        target: TRACING_TARGET,
        trigger_id = %trigger.id,
        "Trigger created"
    );

    Ok((StatusCode::CREATED, Json(trigger.into())))
}

fn create_trigger_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create trigger")
        .description("Registers a trigger; scheduled/polling triggers get a repeatable job.")
        .response::<201, Json<Trigger>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Lists the organization's triggers.
#[tracing::instrument(skip_all, fields(organization_id = %auth_state.organization_id))]
async fn list_triggers(
    PgPool(mut conn): PgPool,
    auth_state: AuthState,
) -> Result<(StatusCode, Json<Triggers>)> {
    let triggers = conn
        .list_org_triggers(auth_state.organization_id, Pagination::default())
        .await?;

    let triggers: Triggers = triggers.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(triggers)))
}

fn list_triggers_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List triggers")
        .description("Returns the organization's registered triggers.")
        .response::<200, Json<Triggers>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Retrieves one trigger.
#[tracing::instrument(skip_all, fields(trigger_id = %path_params.trigger_id))]
async fn read_trigger(
    PgPool(mut conn): PgPool,
    auth_state: AuthState,
    Path(path_params): Path<TriggerPathParams>,
) -> Result<(StatusCode, Json<Trigger>)> {
    let trigger = find_org_trigger(&mut conn, &auth_state, path_params.trigger_id).await?;
    Ok((StatusCode::OK, Json(trigger.into())))
}

fn read_trigger_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get trigger")
        .response::<200, Json<Trigger>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Updates a trigger; enable/disable keeps the scheduler in lockstep.
#[tracing::instrument(skip_all, fields(trigger_id = %path_params.trigger_id))]
async fn update_trigger(
    PgPool(mut conn): PgPool,
    State(registry): State<ProviderRegistry>,
    State(schedule_sync): State<ScheduleSync>,
    auth_state: AuthState,
    Path(path_params): Path<TriggerPathParams>,
    ValidateJson(request): ValidateJson<UpdateTriggerRequest>,
) -> Result<(StatusCode, Json<Trigger>)> {
    let trigger = find_org_trigger(&mut conn, &auth_state, path_params.trigger_id).await?;

    let config = match request.config {
        Some(config) => {
            let provider = registry.get(&trigger.provider).ok_or_else(|| {
                ErrorKind::InternalServerError
                    .with_message("Trigger provider is no longer registered")
                    .into_static()
            })?;
            Some(
                provider
                    .config_schema()
                    .safe_parse(&config)
                    .map_err(prolif_trigger::Error::Config)?,
            )
        }
        None => None,
    };

    let updates = model::UpdateTrigger {
        config,
        enabled: request.enabled,
        polling_cron: request.polling_cron.map(Some),
        ..Default::default()
    };

    let trigger = conn.update_trigger(path_params.trigger_id, updates).await?;

    // Registration follows the row: register on enable, remove on disable.
    schedule_sync.sync_trigger(&mut conn, &trigger).await?;
    let trigger = conn
        .find_trigger_by_id(trigger.id)
        .await?
        .unwrap_or(trigger);

    tracing::info!(target: TRACING_TARGET, "Trigger updated");

    Ok((StatusCode::OK, Json(trigger.into())))
}

fn update_trigger_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update trigger")
        .description("Updates config or enabled state; scheduler registration follows atomically.")
        .response::<200, Json<Trigger>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a trigger and removes its scheduler registration.
#[tracing::instrument(skip_all, fields(trigger_id = %path_params.trigger_id))]
async fn delete_trigger(
    PgPool(mut conn): PgPool,
    State(schedule_sync): State<ScheduleSync>,
    auth_state: AuthState,
    Path(path_params): Path<TriggerPathParams>,
) -> Result<StatusCode> {
    let trigger = find_org_trigger(&mut conn, &auth_state, path_params.trigger_id).await?;

    schedule_sync.forget_trigger(&trigger);
    conn.delete_trigger(trigger.id).await?;

    tracing::info!(target: TRACING_TARGET, "Trigger deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn delete_trigger_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete trigger")
        .response::<204, ()>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists a trigger's recorded events, newest first.
#[tracing::instrument(skip_all, fields(trigger_id = %path_params.trigger_id))]
async fn list_trigger_events(
    PgPool(mut conn): PgPool,
    auth_state: AuthState,
    Path(path_params): Path<TriggerPathParams>,
    Query(query): Query<ListEventsQuery>,
) -> Result<(StatusCode, Json<TriggerEvents>)> {
    let trigger = find_org_trigger(&mut conn, &auth_state, path_params.trigger_id).await?;

    let pagination = Pagination::new(query.limit.unwrap_or(50), query.offset.unwrap_or(0));
    let events = conn.list_trigger_events(trigger.id, pagination).await?;

    let events: TriggerEvents = events
        .into_iter()
        .filter(|event| query.status.is_none_or(|status| event.status == status))
        .map(Into::into)
        .collect();

    Ok((StatusCode::OK, Json(events)))
}

fn list_trigger_events_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List trigger events")
        .response::<200, Json<TriggerEvents>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Loads a trigger scoped to the caller's organization.
async fn find_org_trigger(
    conn: &mut prolif_postgres::PgConnection,
    auth_state: &AuthState,
    trigger_id: uuid::Uuid,
) -> Result<model::Trigger> {
    let Some(trigger) = conn.find_trigger_by_id(trigger_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message("Trigger not found")
            .with_resource("trigger")
            .into_static());
    };

    auth_state.authorize_org(trigger.organization_id)?;
    Ok(trigger)
}

/// Returns routes for trigger management.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/triggers",
            post_with(create_trigger, create_trigger_docs)
                .get_with(list_triggers, list_triggers_docs),
        )
        .api_route(
            "/triggers/{trigger_id}",
            get_with(read_trigger, read_trigger_docs)
                .patch_with(update_trigger, update_trigger_docs)
                .delete_with(delete_trigger, delete_trigger_docs),
        )
        .api_route(
            "/triggers/{trigger_id}/events",
            get_with(list_trigger_events, list_trigger_events_docs),
        )
        .with_path_items(|item| item.tag("Triggers"))
}
