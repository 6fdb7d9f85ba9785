//! Webhook ingress: verify, persist to the inbox, acknowledge.
//!
//! Ingress does no routing, matching, or outbound calls; the only awaited
//! work after signature verification is the inbox insert and the job
//! enqueue, both on the critical path. A post-verification failure still
//! acknowledges with 200 so upstream retry budgets are never poisoned by
//! our own outages.

use std::sync::Arc;

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use prolif_nats::{Job, JobKind, JobQueue};
use prolif_postgres::PgClient;
use prolif_postgres::model::NewWebhookInbox;
use prolif_postgres::query::WebhookInboxRepository;
use prolif_trigger::providers::{GithubAppProvider, NangoProvider};
use prolif_trigger::{ProviderRegistry, TriggerProvider, WebhookDelivery};

use crate::extract::{Json, Path, Query};
use crate::handler::request::{
    DirectWebhookQuery, EntityWebhookPathParams, ProviderWebhookPathParams,
};
use crate::handler::response::{ErrorResponse, WebhookAccepted};
use crate::handler::{ErrorKind, Result};
use crate::service::inbox::MALFORMED_PAYLOAD_KEY;
use crate::service::{RuntimeConfig, ServiceState};

/// Tracing target for webhook ingress.
const TRACING_TARGET: &str = "prolif_server::handler::webhooks";

/// Headers preserved on the inbox row.
const WHITELISTED_HEADERS: &[&str] = &[
    "content-type",
    "user-agent",
    "x-nango-hmac-sha256",
    "x-hub-signature-256",
    "x-github-event",
    "x-github-delivery",
    "x-webhook-signature",
    "x-posthog-signature",
];

/// Receives Nango-proxied webhooks; HMAC verified against the raw body.
#[tracing::instrument(skip_all)]
async fn nango_webhook(
    State(pg_client): State<PgClient>,
    State(queue): State<JobQueue>,
    State(config): State<Arc<RuntimeConfig>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookAccepted>)> {
    let delivery = build_delivery(&headers, &body);

    NangoProvider
        .verify(&delivery, config.nango_secret_key.as_deref())
        .map_err(|err| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "Nango signature verification failed"
            );
            ErrorKind::Unauthorized
                .with_message("Webhook signature verification failed")
                .into_static()
        })?;

    accept(&pg_client, &queue, "nango", None, delivery).await;
    Ok((StatusCode::OK, Json(WebhookAccepted::new())))
}

fn nango_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Nango webhook ingress")
        .description("Verifies the HMAC signature, persists the payload, and acknowledges.")
        .response::<200, Json<WebhookAccepted>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Receives GitHub App deliveries; `sha256=<hex>` verified.
#[tracing::instrument(skip_all)]
async fn github_app_webhook(
    State(pg_client): State<PgClient>,
    State(queue): State<JobQueue>,
    State(config): State<Arc<RuntimeConfig>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookAccepted>)> {
    let delivery = build_delivery(&headers, &body);

    GithubAppProvider
        .verify(&delivery, config.github_app_webhook_secret.as_deref())
        .map_err(|err| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "GitHub signature verification failed"
            );
            ErrorKind::Unauthorized
                .with_message("Webhook signature verification failed")
                .into_static()
        })?;

    accept(&pg_client, &queue, "github-app", None, delivery).await;
    Ok((StatusCode::OK, Json(WebhookAccepted::new())))
}

fn github_app_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("GitHub App webhook ingress")
        .description("Verifies the x-hub-signature-256 header, persists the payload, and acknowledges.")
        .response::<200, Json<WebhookAccepted>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Receives user-defined webhooks addressed by trigger id.
///
/// Signature verification is deferred to the inbox worker, which holds
/// the trigger's secret.
#[tracing::instrument(skip_all, fields(trigger_id = %path_params.entity_id))]
async fn custom_webhook(
    State(pg_client): State<PgClient>,
    State(queue): State<JobQueue>,
    Path(path_params): Path<EntityWebhookPathParams>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<WebhookAccepted>) {
    let delivery = build_delivery(&headers, &body);
    accept(
        &pg_client,
        &queue,
        "custom",
        Some(path_params.entity_id.to_string()),
        delivery,
    )
    .await;
    (StatusCode::OK, Json(WebhookAccepted::new()))
}

fn custom_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Custom webhook ingress")
        .description("Persists a trigger-addressed payload; verification is deferred to the worker.")
        .response::<200, Json<WebhookAccepted>>()
}

/// Receives PostHog action webhooks addressed by automation id.
#[tracing::instrument(skip_all, fields(automation_id = %path_params.entity_id))]
async fn posthog_webhook(
    State(pg_client): State<PgClient>,
    State(queue): State<JobQueue>,
    Path(path_params): Path<EntityWebhookPathParams>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<WebhookAccepted>) {
    let delivery = build_delivery(&headers, &body);
    accept(
        &pg_client,
        &queue,
        "posthog",
        Some(path_params.entity_id.to_string()),
        delivery,
    )
    .await;
    (StatusCode::OK, Json(WebhookAccepted::new()))
}

fn posthog_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("PostHog webhook ingress")
        .description("Persists an automation-addressed payload for async processing.")
        .response::<200, Json<WebhookAccepted>>()
}

/// Receives automation-chaining events addressed by automation id.
#[tracing::instrument(skip_all, fields(automation_id = %path_params.entity_id))]
async fn automation_webhook(
    State(pg_client): State<PgClient>,
    State(queue): State<JobQueue>,
    Path(path_params): Path<EntityWebhookPathParams>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<WebhookAccepted>) {
    let delivery = build_delivery(&headers, &body);
    accept(
        &pg_client,
        &queue,
        "automation",
        Some(path_params.entity_id.to_string()),
        delivery,
    )
    .await;
    (StatusCode::OK, Json(WebhookAccepted::new()))
}

fn automation_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Automation chain webhook ingress")
        .description("Persists an automation-addressed chain event for async processing.")
        .response::<200, Json<WebhookAccepted>>()
}

/// Receives deliveries for any registered provider; requires a routing
/// identity in the payload or query string.
#[tracing::instrument(skip_all, fields(provider_id = %path_params.provider_id))]
async fn direct_webhook(
    State(pg_client): State<PgClient>,
    State(queue): State<JobQueue>,
    State(registry): State<ProviderRegistry>,
    Path(path_params): Path<ProviderWebhookPathParams>,
    Query(query): Query<DirectWebhookQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookAccepted>)> {
    if !registry.contains(&path_params.provider_id) {
        return Err(ErrorKind::NotFound
            .with_message("Unknown webhook provider")
            .with_resource("provider")
            .into_static());
    }

    let delivery = build_delivery(&headers, &body);

    let routing_id = query.routing_id().map(str::to_owned).or_else(|| {
        ["integrationId", "integration_id", "connectionId"]
            .iter()
            .find_map(|key| delivery.payload.get(key))
            .and_then(|v| v.as_str())
            .map(str::to_owned)
    });

    if routing_id.is_none() {
        return Err(ErrorKind::BadRequest
            .with_message(
                "Provide integrationId, integration_id, or connectionId in the payload or query",
            )
            .into_static());
    }

    accept(
        &pg_client,
        &queue,
        &path_params.provider_id,
        routing_id,
        delivery,
    )
    .await;
    Ok((StatusCode::OK, Json(WebhookAccepted::new())))
}

fn direct_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Direct provider webhook ingress")
        .description("Persists a delivery for any registered provider; requires a routing identity.")
        .response::<200, Json<WebhookAccepted>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Builds the delivery view: whitelisted headers plus raw and parsed body.
fn build_delivery(headers: &HeaderMap, body: &Bytes) -> WebhookDelivery {
    let whitelisted = WHITELISTED_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .and_then(|value| value.to_str().ok())
                .map(|value| (name.to_string(), value.to_owned()))
        })
        .collect();

    let payload = serde_json::from_slice(body).unwrap_or_else(|_| {
        serde_json::json!({
            MALFORMED_PAYLOAD_KEY: true,
            "raw": String::from_utf8_lossy(body),
        })
    });

    WebhookDelivery {
        headers: whitelisted,
        body: body.clone(),
        payload,
    }
}

/// Persists the delivery and enqueues its processing job.
///
/// Failures are logged and swallowed: we already committed to a 200.
async fn accept(
    pg_client: &PgClient,
    queue: &JobQueue,
    provider: &str,
    external_id: Option<String>,
    delivery: WebhookDelivery,
) {
    let signature = delivery
        .header("x-nango-hmac-sha256")
        .or_else(|| delivery.header("x-hub-signature-256"))
        .or_else(|| delivery.header("x-webhook-signature"))
        .map(str::to_owned);

    let headers_json = serde_json::to_value(&delivery.headers).unwrap_or_default();

    let result = async {
        let mut conn = pg_client.get_connection().await?;
        let row = conn
            .create_inbox_row(NewWebhookInbox::new(
                provider,
                external_id,
                headers_json,
                delivery.payload,
                signature,
            ))
            .await?;

        Ok::<_, crate::Error>((conn, row))
    }
    .await;

    let row = match result {
        Ok((_conn, row)) => row,
        Err(err) => {
            tracing::error!(
                target: TRACING_TARGET,
                provider = %provider,
                error = %err,
                "Failed to persist webhook; acknowledging anyway"
            );
            return;
        }
    };

    let job = Job::new(JobKind::ProcessInbox { inbox_id: row.id });
    if let Err(err) = queue.submit(&job).await {
        // The row stays pending; a sweep or manual requeue can recover it.
        tracing::error!(
            target: TRACING_TARGET,
            inbox_id = %row.id,
            error = %err,
            "Failed to enqueue inbox job; acknowledging anyway"
        );
        return;
    }

    tracing::debug!(
        target: TRACING_TARGET,
        inbox_id = %row.id,
        provider = %provider,
        "Webhook accepted"
    );
}

/// Returns routes for webhook ingress.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/webhooks/nango", post_with(nango_webhook, nango_webhook_docs))
        .api_route(
            "/webhooks/github-app",
            post_with(github_app_webhook, github_app_webhook_docs),
        )
        .api_route(
            "/webhooks/custom/{entity_id}",
            post_with(custom_webhook, custom_webhook_docs),
        )
        .api_route(
            "/webhooks/posthog/{entity_id}",
            post_with(posthog_webhook, posthog_webhook_docs),
        )
        .api_route(
            "/webhooks/automation/{entity_id}",
            post_with(automation_webhook, automation_webhook_docs),
        )
        .api_route(
            "/webhooks/direct/{provider_id}",
            post_with(direct_webhook, direct_webhook_docs),
        )
        .with_path_items(|item| item.tag("Webhooks"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_bodies_are_marked() {
        let headers = HeaderMap::new();
        let delivery = build_delivery(&headers, &Bytes::from_static(b"not json"));
        assert_eq!(delivery.payload[MALFORMED_PAYLOAD_KEY], true);

        let delivery = build_delivery(&headers, &Bytes::from_static(b"{\"ok\":1}"));
        assert!(delivery.payload.get(MALFORMED_PAYLOAD_KEY).is_none());
    }

    #[test]
    fn header_whitelist_is_applied() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("x-github-event", "issues".parse().unwrap());
        headers.insert("x-internal-secret", "drop-me".parse().unwrap());

        let delivery = build_delivery(&headers, &Bytes::from_static(b"{}"));
        assert_eq!(delivery.header("content-type"), Some("application/json"));
        assert_eq!(delivery.header("x-github-event"), Some("issues"));
        assert_eq!(delivery.header("x-internal-secret"), None);
    }
}
