//! Provider registry: id → capability record.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::provider::{TriggerKind, TriggerProvider};

/// Serializable description of a registered provider for API listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    pub id: String,
    pub provider: String,
    pub trigger_type: TriggerKind,
    pub config_schema: serde_json::Value,
}

/// Registry of trigger providers keyed by id.
///
/// Cheaply cloneable; built once at startup and shared.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<&'static str, Arc<dyn TriggerProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in provider registered.
    pub fn builtin() -> Self {
        use crate::providers;

        Self::new()
            .with(Arc::new(providers::NangoProvider))
            .with(Arc::new(providers::GithubAppProvider))
            .with(Arc::new(providers::CustomProvider))
            .with(Arc::new(providers::PosthogProvider))
            .with(Arc::new(providers::AutomationProvider))
            .with(Arc::new(providers::ScheduledProvider))
            .with(Arc::new(providers::PollingProvider))
    }

    /// Registers a provider, replacing any previous entry with the same id.
    pub fn with(mut self, provider: Arc<dyn TriggerProvider>) -> Self {
        self.providers.insert(provider.id(), provider);
        self
    }

    /// Looks up a provider by id.
    pub fn get(&self, id: &str) -> Option<&Arc<dyn TriggerProvider>> {
        self.providers.get(id)
    }

    /// Returns whether a provider id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// Returns descriptors for every registered provider.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.providers
            .values()
            .map(|provider| ProviderDescriptor {
                id: provider.id().to_owned(),
                provider: provider.provider().to_owned(),
                trigger_type: provider.kind(),
                config_schema: provider.config_schema().to_document(),
            })
            .collect()
    }

    /// Returns the descriptor for one provider.
    pub fn descriptor(&self, id: &str) -> Option<ProviderDescriptor> {
        self.get(id).map(|provider| ProviderDescriptor {
            id: provider.id().to_owned(),
            provider: provider.provider().to_owned(),
            trigger_type: provider.kind(),
            config_schema: provider.config_schema().to_document(),
        })
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_contains_all_routes() {
        let registry = ProviderRegistry::builtin();
        for id in [
            "nango",
            "github-app",
            "custom",
            "posthog",
            "automation",
            "scheduled",
            "polling",
        ] {
            assert!(registry.contains(id), "missing provider {id}");
        }
    }

    #[test]
    fn descriptors_carry_schemas() {
        let registry = ProviderRegistry::builtin();
        let descriptors = registry.descriptors();
        assert_eq!(descriptors.len(), 7);
        for descriptor in descriptors {
            assert_eq!(descriptor.config_schema["type"], "object");
        }
    }
}
