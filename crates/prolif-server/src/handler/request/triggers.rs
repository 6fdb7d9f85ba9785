//! Trigger management request types.

use prolif_postgres::model;
use prolif_postgres::types::{TriggerEventStatus, TriggerType};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request payload for registering a trigger.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrigger {
    /// Automation this trigger fires.
    pub automation_id: Uuid,

    /// Provider registry key.
    #[validate(length(min = 1, max = 64))]
    pub provider: String,

    /// How this trigger produces events.
    pub trigger_type: TriggerType,

    /// Integration connection for connection-routed providers.
    pub integration_id: Option<Uuid>,

    /// Provider-specific config; validated against the provider schema.
    #[serde(default)]
    pub config: serde_json::Value,

    /// Whether the trigger starts enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Cron cadence for polling triggers.
    #[validate(length(min = 1, max = 128))]
    pub polling_cron: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl CreateTrigger {
    /// Converts the request into the insert model.
    pub fn into_model(self, organization_id: Uuid, config: serde_json::Value) -> model::NewTrigger {
        model::NewTrigger {
            organization_id,
            automation_id: self.automation_id,
            provider: self.provider,
            trigger_type: self.trigger_type,
            integration_id: self.integration_id,
            config,
            enabled: self.enabled,
            polling_cron: self.polling_cron,
        }
    }
}

/// Request payload for updating a trigger.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrigger {
    /// Updated provider config.
    pub config: Option<serde_json::Value>,

    /// Updated enabled state; drives scheduler registration.
    pub enabled: Option<bool>,

    /// Updated cron cadence for polling triggers.
    #[validate(length(min = 1, max = 128))]
    pub polling_cron: Option<String>,
}

/// Query parameters for listing trigger events.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    /// Filter by status.
    pub status: Option<TriggerEventStatus>,
    /// Maximum records to return.
    pub limit: Option<i64>,
    /// Records to skip.
    pub offset: Option<i64>,
}
