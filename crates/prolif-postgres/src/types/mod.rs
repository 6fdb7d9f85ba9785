//! Contains constraints, enumerations and other custom types.

mod constants;
mod constraint;
mod enums;

pub use constants::{DEFAULT_INBOX_RETENTION_DAYS, DEFAULT_MAX_CONCURRENT_SESSIONS};
pub use constraint::{
    ActionGrantConstraints, ApiTokenConstraints, ConstraintViolation, IntegrationConstraints,
    OrganizationConstraints, TriggerEventConstraints,
};
pub use enums::{
    ApiTokenKind, BillingState, ClientType, ConfigurationStatus, InboxStatus, IntegrationStatus,
    InvocationStatus, OrgRole, RiskLevel, RunStatus, SessionStatus, TriggerEventStatus,
    TriggerType,
};
