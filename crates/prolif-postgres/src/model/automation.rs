//! Automation model: user-defined event-to-session rules.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::automations;

/// A user-defined rule that, when its trigger fires, creates a run.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = automations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Automation {
    /// Unique automation identifier.
    pub id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Configuration sessions boot from.
    pub configuration_id: Option<Uuid>,
    /// Display name.
    pub display_name: String,
    /// Instruction payload handed to the session.
    pub instructions: serde_json::Value,
    /// Whether firings create runs.
    pub enabled: bool,
    /// When the automation was created.
    pub created_at: Timestamp,
    /// When the automation was last modified.
    pub updated_at: Timestamp,
}

/// Data for creating an automation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = automations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAutomation {
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Configuration.
    pub configuration_id: Option<Uuid>,
    /// Display name (required).
    pub display_name: String,
    /// Instruction payload.
    pub instructions: serde_json::Value,
    /// Initial enabled state.
    pub enabled: bool,
}

/// Data for updating an automation.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = automations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAutomation {
    /// Configuration.
    pub configuration_id: Option<Option<Uuid>>,
    /// Display name.
    pub display_name: Option<String>,
    /// Instruction payload.
    pub instructions: Option<serde_json::Value>,
    /// Enabled state.
    pub enabled: Option<bool>,
    /// Modification timestamp.
    pub updated_at: Option<Timestamp>,
}
