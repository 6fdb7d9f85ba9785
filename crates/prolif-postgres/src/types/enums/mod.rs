//! Database enumeration types for type-safe queries.
//!
//! Each enumeration corresponds to a PostgreSQL ENUM type defined in the
//! schema, with serde support for APIs and Diesel integration for queries.

pub mod api_token_kind;
pub mod billing_state;
pub mod client_type;
pub mod configuration_status;
pub mod inbox_status;
pub mod integration_status;
pub mod invocation_status;
pub mod org_role;
pub mod risk_level;
pub mod run_status;
pub mod session_status;
pub mod trigger_event_status;
pub mod trigger_type;

pub use api_token_kind::ApiTokenKind;
pub use billing_state::BillingState;
pub use client_type::ClientType;
pub use configuration_status::ConfigurationStatus;
pub use inbox_status::InboxStatus;
pub use integration_status::IntegrationStatus;
pub use invocation_status::InvocationStatus;
pub use org_role::OrgRole;
pub use risk_level::RiskLevel;
pub use run_status::RunStatus;
pub use session_status::SessionStatus;
pub use trigger_event_status::TriggerEventStatus;
pub use trigger_type::TriggerType;
