//! Integration model: external connections routed by webhooks.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::integrations;
use crate::types::IntegrationStatus;

/// An external integration connection, the routing target of a webhook
/// delivery's connection id.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = integrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Integration {
    /// Unique integration identifier.
    pub id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Provider family (`nango`, `github-app`, ...).
    pub provider: String,
    /// External connection identifier.
    pub connection_id: String,
    /// Access token for adapter execution.
    pub access_token: Option<String>,
    /// Connection status.
    pub status: IntegrationStatus,
    /// When the connection was created.
    pub created_at: Timestamp,
}

/// Data for creating an integration.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = integrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewIntegration {
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Provider family (required).
    pub provider: String,
    /// External connection id (required).
    pub connection_id: String,
    /// Access token.
    pub access_token: Option<String>,
}

impl Integration {
    /// Returns whether deliveries route to this integration.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
