#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod event;
mod provider;
pub mod providers;
mod registry;
pub mod signature;

/// Tracing target for provider dispatch and filtering.
pub const TRACING_TARGET_PROVIDER: &str = "prolif_trigger::provider";

/// Tracing target for signature verification.
pub const TRACING_TARGET_SIGNATURE: &str = "prolif_trigger::signature";

pub use error::{Error, Result};
pub use event::{ProviderEvent, WebhookDelivery};
pub use provider::{TriggerKind, TriggerProvider};
pub use registry::{ProviderDescriptor, ProviderRegistry};
