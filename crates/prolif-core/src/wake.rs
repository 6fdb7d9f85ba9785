//! Wakeable client capability.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ClientSource;
use crate::Result;

/// The message content delivered with a wake call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WakeMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

/// An async client that can be woken when a session gains new work.
///
/// Wake calls MUST be idempotent on the client side: a second wake arriving
/// before the first completes is a no-op. The client's own message log is
/// the ordering authority; the bus provides none.
#[async_trait::async_trait]
pub trait WakeableClient: Send + Sync {
    /// The client type this implementation serves.
    fn client_type(&self) -> ClientSource;

    /// Wakes the client for a session so it pulls newly posted context.
    async fn wake(
        &self,
        session_id: Uuid,
        client_metadata: &serde_json::Value,
        source: ClientSource,
        message: WakeMessage,
    ) -> Result<()>;
}
