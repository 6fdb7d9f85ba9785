#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod adapter;
mod error;
mod gateway;
mod sandbox;
pub mod schema;
mod services;
mod types;
mod wake;

pub use adapter::{ActionAdapter, AdapterRequest};
pub use error::{Error, Result};
pub use gateway::{CreateSessionInput, CreatedSession, SessionGateway, UpdateSessionPatch};
pub use sandbox::{SandboxProvider, SnapshotRepo, SnapshotRequest};
pub use schema::{FieldKind, SchemaError, SchemaSpec};
pub use services::RuntimeServices;
pub use types::{ClientSource, GatedOperation};
pub use wake::{WakeMessage, WakeableClient};
