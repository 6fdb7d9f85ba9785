//! Services behind the HTTP surface and the worker fleet.

pub mod actions;
pub mod fire;
pub mod gate;
pub mod gateway;
pub mod inbox;
pub mod runs;
pub mod sandbox;
pub mod schedule;
mod service_config;
mod service_state;
pub mod sessions;
pub mod snapshot;
pub mod wake_clients;

pub use service_config::{RuntimeConfig, ServiceConfig};
pub use service_state::ServiceState;
