//! Organization billing model: the authoritative credit/state record.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::org_billing;
use crate::types::BillingState;

/// The authoritative credit/state record for one organization.
///
/// `shadow_balance` is the source of truth for gating in `trial`, `grace`,
/// and `suspended`; the external provider is authoritative only in `active`.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = org_billing)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrgBilling {
    /// Organization this record belongs to.
    pub organization_id: Uuid,
    /// Billing state driving the gate.
    pub billing_state: BillingState,
    /// Locally authoritative credit count.
    pub shadow_balance: i64,
    /// When the grace window closes.
    pub grace_expires_at: Option<Timestamp>,
    /// External billing provider customer reference.
    pub autumn_customer_id: Option<String>,
    /// Plan identifier.
    pub billing_plan: String,
    /// Whether overage billing is enabled.
    pub overage_enabled: bool,
    /// Overage cap, when enabled.
    pub overage_limit: Option<i64>,
    /// Last modification (billing event handler writes).
    pub updated_at: Timestamp,
}

/// Data for creating a billing record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = org_billing)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewOrgBilling {
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Initial billing state.
    pub billing_state: BillingState,
    /// Initial credit balance.
    pub shadow_balance: i64,
    /// Plan identifier.
    pub billing_plan: String,
}

/// Data for updating a billing record.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = org_billing)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateOrgBilling {
    /// Billing state.
    pub billing_state: Option<BillingState>,
    /// Credit balance.
    pub shadow_balance: Option<i64>,
    /// Grace window deadline.
    pub grace_expires_at: Option<Option<Timestamp>>,
    /// External customer reference.
    pub autumn_customer_id: Option<Option<String>>,
    /// Plan identifier.
    pub billing_plan: Option<String>,
    /// Modification timestamp.
    pub updated_at: Option<Timestamp>,
}

impl OrgBilling {
    /// Returns whether the grace window has closed as of `now`.
    pub fn grace_expired_at(&self, now: jiff::Timestamp) -> bool {
        self.billing_state == BillingState::Grace
            && self
                .grace_expires_at
                .is_some_and(|deadline| jiff::Timestamp::from(deadline) <= now)
    }
}
