//! CLI configuration management.
//!
//! The complete configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── service: ServiceConfig       # Database, NATS, runtime knobs
//! ├── middleware: MiddlewareConfig # Recovery/timeouts
//! └── server: ServerConfig         # Host, port, shutdown
//! ```
//!
//! Every option can be provided via CLI arguments or environment
//! variables; use `--help` to see them all.

mod middleware;
mod server;

use clap::Parser;
pub use middleware::MiddlewareConfig;
use prolif_server::service::ServiceConfig;
pub use server::ServerConfig;

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
#[derive(Debug, Parser)]
#[command(
    name = "prolif-cli",
    about = "Proliferate automation runtime: HTTP API server and workers",
    version
)]
pub struct Cli {
    /// External service connections and runtime knobs.
    #[command(flatten)]
    pub service: ServiceConfig,

    /// HTTP middleware configuration.
    #[command(flatten)]
    pub middleware: MiddlewareConfig,

    /// Network binding and shutdown configuration.
    #[command(flatten)]
    pub server: ServerConfig,
}

/// Logs the resolved server configuration at startup.
pub fn log_server_config(config: &ServerConfig) {
    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        host = %config.host,
        port = config.port,
        shutdown_timeout_secs = config.shutdown_timeout,
        "server configuration"
    );
}
