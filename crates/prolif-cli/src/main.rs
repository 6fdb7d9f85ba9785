#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use prolif_server::handler::routes;
use prolif_server::middleware::{RouterObservabilityExt, RouterRecoveryExt};
use prolif_server::service::ServiceState;
use prolif_server::worker::spawn_workers;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Cli, MiddlewareConfig, log_server_config};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "prolif_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "prolif_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "prolif_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_tracing();
    log_startup_info();
    log_server_config(&cli.server);

    cli.server
        .validate()
        .context("invalid server configuration")?;

    let state = ServiceState::from_config(cli.service)
        .await
        .context("failed to create service state")?;

    // The schema is embedded; every start converges the database.
    prolif_postgres::run_pending_migrations(state.pg_client())
        .await
        .context("failed to run database migrations")?;

    let cancel = CancellationToken::new();
    let workers = spawn_workers(state.clone(), cancel.clone())
        .await
        .context("failed to start worker fleet")?;

    let router = create_router(state, &cli.middleware);
    let serve_result = server::serve(router, cli.server.clone()).await;

    // The HTTP surface is down; drain the workers within the deadline.
    cancel.cancel();
    let drain = cli.server.shutdown_timeout();
    for handle in workers {
        match tokio::time::timeout(drain, handle).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(err))) => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %err,
                    "worker exited with error"
                );
            }
            Ok(Err(join_error)) => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %join_error,
                    "worker task panicked"
                );
            }
            Err(_) => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    timeout = ?drain,
                    "worker did not drain before the deadline"
                );
            }
        }
    }

    serve_result
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    let api_routes: Router = routes().with_state(state).into();

    api_routes
        .with_observability()
        .with_recovery(middleware.recovery.clone())
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info() {
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting proliferate runtime"
    );

    tracing::debug!(
        target: TRACING_TARGET_SERVER_STARTUP,
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        "build information"
    );
}
