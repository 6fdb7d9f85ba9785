//! Organization model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::organizations;

/// An organization: the exclusive owner of triggers, sessions, runs, and
/// billing state.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Organization {
    /// Unique organization identifier.
    pub id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Plan identifier.
    pub billing_plan: String,
    /// Concurrent session limit for the plan.
    pub max_concurrent_sessions: i32,
    /// When the organization was created.
    pub created_at: Timestamp,
    /// When the organization was last modified.
    pub updated_at: Timestamp,
}

/// Data for creating an organization.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewOrganization {
    /// Display name (required).
    pub display_name: String,
    /// Plan identifier.
    pub billing_plan: String,
    /// Concurrent session limit.
    pub max_concurrent_sessions: i32,
}

/// Data for updating an organization.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateOrganization {
    /// Display name.
    pub display_name: Option<String>,
    /// Plan identifier.
    pub billing_plan: Option<String>,
    /// Concurrent session limit.
    pub max_concurrent_sessions: Option<i32>,
    /// Modification timestamp.
    pub updated_at: Option<Timestamp>,
}
