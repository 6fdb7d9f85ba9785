//! Health monitoring response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Liveness probe response.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Health {
    /// Service status; `ok` when the process is serving.
    pub status: String,
}

impl Health {
    /// The healthy response.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_owned(),
        }
    }
}
