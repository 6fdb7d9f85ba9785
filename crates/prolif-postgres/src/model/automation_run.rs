//! Automation run model: one firing of an automation.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::automation_runs;
use crate::types::RunStatus;

/// A single firing of an automation.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = automation_runs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AutomationRun {
    /// Unique run identifier.
    pub id: Uuid,
    /// Automation that fired.
    pub automation_id: Uuid,
    /// Trigger event that caused the firing, if any.
    pub trigger_event_id: Option<Uuid>,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Execution status.
    pub status: RunStatus,
    /// Session carrying out the work.
    pub session_id: Option<Uuid>,
    /// Error details if the run failed.
    pub error_message: Option<String>,
    /// When the run was created/queued.
    pub queued_at: Timestamp,
    /// When the run finished.
    pub completed_at: Option<Timestamp>,
}

/// Data for creating a new run.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = automation_runs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAutomationRun {
    /// Automation ID (required).
    pub automation_id: Uuid,
    /// Trigger event.
    pub trigger_event_id: Option<Uuid>,
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Initial status.
    pub status: RunStatus,
    /// Session, when known at creation.
    pub session_id: Option<Uuid>,
}

/// Data for updating a run.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = automation_runs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAutomationRun {
    /// Execution status.
    pub status: Option<RunStatus>,
    /// Session.
    pub session_id: Option<Option<Uuid>>,
    /// Error details.
    pub error_message: Option<Option<String>>,
    /// Completion timestamp.
    pub completed_at: Option<Option<Timestamp>>,
}

impl AutomationRun {
    /// Returns whether the run is still active.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns whether the run has finished.
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }
}
