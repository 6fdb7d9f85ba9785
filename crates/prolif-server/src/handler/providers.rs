//! Trigger provider listing handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use prolif_trigger::ProviderRegistry;

use crate::extract::{Json, Path};
use crate::handler::response::{ErrorResponse, Provider, Providers};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Lists every registered trigger provider with its config schema.
async fn list_providers(
    State(registry): State<ProviderRegistry>,
) -> (StatusCode, Json<Providers>) {
    let providers: Providers = registry.descriptors().into_iter().collect();
    (StatusCode::OK, Json(providers))
}

fn list_providers_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List providers")
        .description("Returns every registered trigger provider keyed by id.")
        .response::<200, Json<Providers>>()
}

/// Path parameters for provider lookup.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
struct ProviderPathParams {
    provider_id: String,
}

/// Retrieves one provider descriptor.
async fn read_provider(
    State(registry): State<ProviderRegistry>,
    Path(path_params): Path<ProviderPathParams>,
) -> Result<(StatusCode, Json<Provider>)> {
    let Some(descriptor) = registry.descriptor(&path_params.provider_id) else {
        return Err(ErrorKind::NotFound
            .with_message("Provider not found")
            .with_resource("provider")
            .into_static());
    };

    Ok((StatusCode::OK, Json(descriptor.into())))
}

fn read_provider_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get provider")
        .response::<200, Json<Provider>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for provider listings.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/providers", get_with(list_providers, list_providers_docs))
        .api_route(
            "/providers/{provider_id}",
            get_with(read_provider, read_provider_docs),
        )
        .with_path_items(|item| item.tag("Providers"))
}
