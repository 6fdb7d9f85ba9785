//! Organization membership model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::org_members;
use crate::types::OrgRole;

/// Membership of an account in an organization.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = org_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrgMember {
    /// Organization.
    pub organization_id: Uuid,
    /// Member account.
    pub account_id: Uuid,
    /// Role within the organization.
    pub role: OrgRole,
    /// When the membership was created.
    pub created_at: Timestamp,
}

/// Data for creating a membership.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = org_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewOrgMember {
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Account ID (required).
    pub account_id: Uuid,
    /// Role.
    pub role: OrgRole,
}
