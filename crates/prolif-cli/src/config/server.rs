//! HTTP server configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::anyhow;
use clap::Args;
use serde::{Deserialize, Serialize};

/// HTTP server configuration: network binding, timeouts, shutdown.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Host address to bind the server to.
    ///
    /// Use "127.0.0.1" for localhost only, "0.0.0.0" for all interfaces.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// TCP port number for the server to listen on.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Maximum time in seconds to wait for graceful shutdown.
    ///
    /// During shutdown the server stops accepting connections and waits up
    /// to this long for in-flight requests and jobs to finish.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,
}

const MAX_TIMEOUT_SECS: u64 = 300;

impl ServerConfig {
    /// Returns the socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the shutdown drain deadline.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.port < 1024 {
            return Err(anyhow!("port must be 1024 or higher"));
        }

        if self.shutdown_timeout == 0 || self.shutdown_timeout > MAX_TIMEOUT_SECS {
            return Err(anyhow!(
                "shutdown_timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: u16, shutdown_timeout: u64) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port,
            shutdown_timeout,
        }
    }

    #[test]
    fn validation_bounds() {
        assert!(config(3000, 30).validate().is_ok());
        assert!(config(80, 30).validate().is_err());
        assert!(config(3000, 0).validate().is_err());
        assert!(config(3000, 301).validate().is_err());
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        assert_eq!(config(8080, 30).socket_addr().to_string(), "127.0.0.1:8080");
    }
}
