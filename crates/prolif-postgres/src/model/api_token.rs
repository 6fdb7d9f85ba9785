//! API token model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::api_tokens;
use crate::types::ApiTokenKind;

/// A bearer token binding an account to an organization.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = api_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApiToken {
    /// Unique token identifier.
    pub id: Uuid,
    /// Account the token authenticates.
    pub account_id: Uuid,
    /// Organization scope.
    pub organization_id: Uuid,
    /// Opaque token value.
    pub token: String,
    /// Principal class.
    pub kind: ApiTokenKind,
    /// When the token was minted.
    pub created_at: Timestamp,
    /// When the token was revoked, if it was.
    pub revoked_at: Option<Timestamp>,
}

/// Data for minting a token.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = api_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewApiToken {
    /// Account ID (required).
    pub account_id: Uuid,
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Token value (required).
    pub token: String,
    /// Principal class.
    pub kind: ApiTokenKind,
}

impl ApiToken {
    /// Returns whether the token is usable.
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }

    /// Returns whether the token authenticates an interactive user.
    pub fn is_interactive(&self) -> bool {
        self.kind.is_interactive()
    }
}
