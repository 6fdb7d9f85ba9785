//! Provider listing response types.

use std::collections::BTreeMap;

use prolif_trigger::ProviderDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One registered trigger provider.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Registry key and webhook route segment.
    pub id: String,
    /// Provider family.
    pub provider: String,
    /// How triggers of this provider produce events.
    pub trigger_type: String,
    /// JSON-Schema-shaped description of the accepted trigger config.
    pub config_schema: serde_json::Value,
}

impl From<ProviderDescriptor> for Provider {
    fn from(descriptor: ProviderDescriptor) -> Self {
        Self {
            id: descriptor.id,
            provider: descriptor.provider,
            trigger_type: descriptor.trigger_type.to_string(),
            config_schema: descriptor.config_schema,
        }
    }
}

/// The full provider registry, keyed by provider id.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Providers {
    pub providers: BTreeMap<String, Provider>,
}

impl FromIterator<ProviderDescriptor> for Providers {
    fn from_iter<I: IntoIterator<Item = ProviderDescriptor>>(iter: I) -> Self {
        Self {
            providers: iter
                .into_iter()
                .map(|descriptor| (descriptor.id.clone(), descriptor.into()))
                .collect(),
        }
    }
}
