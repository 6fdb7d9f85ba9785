//! HTTP server startup and graceful shutdown.

mod shutdown;

use axum::Router;
use tokio::net::TcpListener;

pub(crate) use shutdown::shutdown_signal;

use crate::config::ServerConfig;
use crate::TRACING_TARGET_SERVER_STARTUP;

/// Starts the HTTP server and serves until a shutdown signal arrives.
pub async fn serve(app: Router, config: ServerConfig) -> anyhow::Result<()> {
    let server_addr = config.socket_addr();
    let shutdown_timeout = config.shutdown_timeout();

    let listener = TcpListener::bind(server_addr).await?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    Ok(())
}
