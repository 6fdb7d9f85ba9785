//! Database query repositories for all entities in the system.
//!
//! Repository traits encapsulate the query patterns each entity needs and
//! are implemented for [`PgConnection`], so any pooled connection carries
//! every repository.
//!
//! [`PgConnection`]: crate::PgConnection

pub mod action_grant;
pub mod action_invocation;
pub mod api_token;
pub mod automation;
pub mod automation_run;
pub mod configuration;
pub mod integration;
pub mod org_billing;
pub mod org_member;
pub mod organization;
pub mod session;
pub mod trigger;
pub mod trigger_event;
pub mod webhook_inbox;

pub use action_grant::ActionGrantRepository;
pub use action_invocation::ActionInvocationRepository;
pub use api_token::ApiTokenRepository;
pub use automation::AutomationRepository;
pub use automation_run::AutomationRunRepository;
pub use configuration::ConfigurationRepository;
pub use integration::IntegrationRepository;
pub use org_billing::OrgBillingRepository;
pub use org_member::OrgMemberRepository;
pub use organization::OrganizationRepository;
pub use session::{SessionCounts, SessionRepository};
pub use trigger::TriggerRepository;
pub use trigger_event::TriggerEventRepository;
pub use webhook_inbox::WebhookInboxRepository;
use serde::{Deserialize, Serialize};

/// Pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl Pagination {
    /// Creates a new pagination instance with clamped bounds.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, 1000),
            offset: offset.max(0),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_bounds() {
        let pagination = Pagination::new(5000, -3);
        assert_eq!(pagination.limit, 1000);
        assert_eq!(pagination.offset, 0);
    }
}
