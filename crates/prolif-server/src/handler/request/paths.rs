//! Shared path parameter types.

use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

/// Path parameters for entity-addressed webhook routes.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EntityWebhookPathParams {
    /// Addressed trigger or automation id.
    pub entity_id: Uuid,
}

/// Path parameters for `/webhooks/direct/{provider_id}`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProviderWebhookPathParams {
    /// Provider registry key.
    pub provider_id: String,
}

/// Path parameters for trigger routes.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TriggerPathParams {
    pub trigger_id: Uuid,
}

/// Path parameters for session routes.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SessionPathParams {
    pub session_id: Uuid,
}

/// Path parameters for invocation routes.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct InvocationPathParams {
    pub session_id: Uuid,
    pub invocation_id: Uuid,
}

/// Path parameters for configuration routes.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConfigurationPathParams {
    pub configuration_id: Uuid,
}
