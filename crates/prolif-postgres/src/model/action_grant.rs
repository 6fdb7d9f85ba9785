//! Action grant model: reusable approval policy records.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::action_grants;

/// A reusable approval recorded during grant-mode approval.
///
/// Matching pending actions bypass approval until the scope's call budget
/// is exhausted. Grants are additive policy; they never block a deny.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = action_grants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActionGrant {
    /// Unique grant identifier.
    pub id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Session the grant is scoped to.
    pub session_id: Uuid,
    /// Scope covered, as `<integration>:<action>`.
    pub scope: String,
    /// Call budget.
    pub max_calls: i32,
    /// Calls consumed so far.
    pub used_calls: i32,
    /// Account that granted.
    pub granted_by: Uuid,
    /// When the grant was recorded.
    pub created_at: Timestamp,
}

/// Data for creating a new grant.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = action_grants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewActionGrant {
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Session ID (required).
    pub session_id: Uuid,
    /// Scope covered.
    pub scope: String,
    /// Call budget.
    pub max_calls: i32,
    /// Granting account.
    pub granted_by: Uuid,
}

impl ActionGrant {
    /// Returns whether the grant has remaining calls.
    pub fn has_remaining_calls(&self) -> bool {
        self.used_calls < self.max_calls
    }

    /// Returns the remaining call budget.
    pub fn remaining_calls(&self) -> i32 {
        (self.max_calls - self.used_calls).max(0)
    }
}
