//! Runtime services container for dependency injection.

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::ActionAdapter;
use crate::gateway::SessionGateway;
use crate::sandbox::SandboxProvider;
use crate::types::ClientSource;
use crate::wake::WakeableClient;

/// Container for external capability implementations.
///
/// Holds the gateway plus the sandbox/adapter/wake registries, enabling
/// dependency injection into application state. Dispatch is by registry
/// lookup; an absent entry is a routing decision, not an error.
#[derive(Clone)]
pub struct RuntimeServices {
    gateway: Arc<dyn SessionGateway>,
    sandboxes: HashMap<&'static str, Arc<dyn SandboxProvider>>,
    adapters: HashMap<&'static str, Arc<dyn ActionAdapter>>,
    wake_clients: HashMap<ClientSource, Arc<dyn WakeableClient>>,
}

impl RuntimeServices {
    /// Creates a services container with the given gateway and empty registries.
    pub fn new(gateway: Arc<dyn SessionGateway>) -> Self {
        Self {
            gateway,
            sandboxes: HashMap::new(),
            adapters: HashMap::new(),
            wake_clients: HashMap::new(),
        }
    }

    /// Registers a sandbox provider.
    pub fn with_sandbox(mut self, provider: Arc<dyn SandboxProvider>) -> Self {
        self.sandboxes.insert(provider.id(), provider);
        self
    }

    /// Registers an action adapter.
    pub fn with_adapter(mut self, adapter: Arc<dyn ActionAdapter>) -> Self {
        self.adapters.insert(adapter.integration(), adapter);
        self
    }

    /// Registers a wakeable client.
    pub fn with_wake_client(mut self, client: Arc<dyn WakeableClient>) -> Self {
        self.wake_clients.insert(client.client_type(), client);
        self
    }

    /// Returns the session gateway.
    #[inline]
    pub fn gateway(&self) -> &Arc<dyn SessionGateway> {
        &self.gateway
    }

    /// Looks up a sandbox provider by id.
    pub fn sandbox(&self, id: &str) -> Option<&Arc<dyn SandboxProvider>> {
        self.sandboxes.get(id)
    }

    /// Looks up an action adapter by integration name.
    pub fn adapter(&self, integration: &str) -> Option<&Arc<dyn ActionAdapter>> {
        self.adapters.get(integration)
    }

    /// Looks up the wakeable client for a client type.
    pub fn wake_client(&self, client_type: ClientSource) -> Option<&Arc<dyn WakeableClient>> {
        self.wake_clients.get(&client_type)
    }
}

impl std::fmt::Debug for RuntimeServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeServices")
            .field("sandboxes", &self.sandboxes.keys().collect::<Vec<_>>())
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .field(
                "wake_clients",
                &self.wake_clients.keys().collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
