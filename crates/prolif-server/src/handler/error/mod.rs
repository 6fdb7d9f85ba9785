//! [`Error`], [`ErrorKind`] and [`Result`].

mod action_error;
mod capability_error;
mod crate_error;
mod gate_error;
mod http_error;
mod nats_error;
mod pg_error;
mod session_error;
mod trigger_error;

pub use http_error::{Error, ErrorKind, Result};
