//! Response payloads for all handlers.

mod actions;
mod error_response;
mod monitors;
mod providers;
mod runs;
mod sessions;
mod triggers;
mod webhooks;

pub use actions::{Invocation, Invocations};
pub use error_response::ErrorResponse;
pub use monitors::Health;
pub use providers::{Provider, Providers};
pub use runs::{Run, Runs};
pub use sessions::{Session, Sessions};
pub use triggers::{Trigger, TriggerEvent, TriggerEvents, Triggers};
pub use webhooks::WebhookAccepted;
