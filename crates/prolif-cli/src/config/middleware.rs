//! HTTP middleware configuration.

use clap::Args;
use prolif_server::middleware::RecoveryConfig;
use serde::{Deserialize, Serialize};

/// Middleware configuration for the HTTP surface.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct MiddlewareConfig {
    /// Recovery layer: panic catching and request deadlines.
    #[command(flatten)]
    pub recovery: RecoveryConfig,
}
