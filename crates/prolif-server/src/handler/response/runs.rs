//! Automation run response types.

use jiff::Timestamp;
use prolif_postgres::model;
use prolif_postgres::types::RunStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One automation run.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Automation that fired.
    pub automation_id: Uuid,
    /// Trigger event that caused the firing.
    pub trigger_event_id: Option<Uuid>,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Execution status.
    pub status: RunStatus,
    /// Session carrying out the work.
    pub session_id: Option<Uuid>,
    /// Error details if the run failed.
    pub error_message: Option<String>,
    /// When the run was queued.
    pub queued_at: Timestamp,
    /// When the run finished.
    pub completed_at: Option<Timestamp>,
}

impl From<model::AutomationRun> for Run {
    fn from(run: model::AutomationRun) -> Self {
        Self {
            run_id: run.id,
            automation_id: run.automation_id,
            trigger_event_id: run.trigger_event_id,
            organization_id: run.organization_id,
            status: run.status,
            session_id: run.session_id,
            error_message: run.error_message,
            queued_at: run.queued_at.into(),
            completed_at: run.completed_at.map(Into::into),
        }
    }
}

/// List of runs.
pub type Runs = Vec<Run>;
