//! Request payloads and path/query parameter types.

mod actions;
mod paths;
mod runs;
mod sessions;
mod triggers;
mod webhooks;

pub use actions::{ApprovalMode, ApproveAction, GrantSpec, ListInvocationsQuery};
pub use paths::{
    ConfigurationPathParams, EntityWebhookPathParams, InvocationPathParams,
    ProviderWebhookPathParams, SessionPathParams, TriggerPathParams,
};
pub use runs::ListRunsQuery;
pub use sessions::{ListSessionsQuery, PauseSession, StartSession, UpdateSessionRegistry};
pub use triggers::{CreateTrigger, ListEventsQuery, UpdateTrigger};
pub use webhooks::DirectWebhookQuery;
