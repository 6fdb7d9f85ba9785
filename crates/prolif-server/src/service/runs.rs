//! Run creation: one automation firing becoming a run plus its session.

use prolif_core::ClientSource;
use prolif_postgres::PgConnection;
use prolif_postgres::model::{Automation, AutomationRun, NewAutomationRun};
use prolif_postgres::query::AutomationRunRepository;
use prolif_postgres::types::RunStatus;
use uuid::Uuid;

use crate::service::sessions::{SessionError, SessionService, StartSessionInput};

/// Tracing target for run creation.
const TRACING_TARGET: &str = "prolif_server::service::runs";

/// Default sandbox provider for automation sessions.
const DEFAULT_SANDBOX_PROVIDER: &str = "modal";

/// Creates runs and their automation-bound sessions.
#[derive(Clone)]
pub struct RunLauncher {
    sessions: SessionService,
}

impl RunLauncher {
    /// Creates a launcher over the session lifecycle service.
    pub fn new(sessions: SessionService) -> Self {
        Self { sessions }
    }

    /// Creates a run for a trigger event and spawns its session.
    ///
    /// On failure the run is marked `failed` before the error propagates,
    /// so every fire stays observable.
    #[tracing::instrument(skip_all, fields(automation_id = %automation.id))]
    pub async fn launch(
        &self,
        conn: &mut PgConnection,
        automation: &Automation,
        trigger_event_id: Option<Uuid>,
        context: serde_json::Value,
    ) -> Result<(AutomationRun, Uuid), SessionError> {
        let run = conn
            .create_automation_run(NewAutomationRun {
                automation_id: automation.id,
                trigger_event_id,
                organization_id: automation.organization_id,
                status: RunStatus::Queued,
                session_id: None,
            })
            .await?;

        let prompt = build_prompt(automation, &context);

        let started = self
            .sessions
            .start(
                conn,
                StartSessionInput {
                    organization_id: automation.organization_id,
                    configuration_id: automation.configuration_id,
                    client_type: ClientSource::Automation,
                    client_metadata: serde_json::json!({
                        "automationId": automation.id,
                        "runId": run.id,
                    }),
                    prompt: Some(prompt),
                    automation_id: Some(automation.id),
                    trigger_event_id,
                    sandbox_provider: DEFAULT_SANDBOX_PROVIDER.to_owned(),
                },
            )
            .await;

        match started {
            Ok(session) => {
                let run = conn.start_automation_run(run.id, session.id).await?;

                tracing::info!(
                    target: TRACING_TARGET,
                    run_id = %run.id,
                    session_id = %session.id,
                    "Run launched"
                );

                Ok((run, session.id))
            }
            Err(error) => {
                let message = launch_error_message(&error);
                conn.finish_automation_run(run.id, RunStatus::Failed, Some(message.clone()))
                    .await?;

                tracing::warn!(
                    target: TRACING_TARGET,
                    run_id = %run.id,
                    error = %message,
                    "Run launch failed"
                );

                Err(error)
            }
        }
    }
}

fn build_prompt(automation: &Automation, context: &serde_json::Value) -> String {
    let instructions = automation
        .instructions
        .get("prompt")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    format!(
        "{instructions}\n\n## Trigger context\n```json\n{}\n```",
        serde_json::to_string_pretty(context).unwrap_or_else(|_| context.to_string())
    )
}

fn launch_error_message(error: &SessionError) -> String {
    match error {
        SessionError::Gate(deny) => format!("gate denied: {}", deny.code.as_str()),
        SessionError::Gateway(err) => format!("gateway error: {err}"),
        SessionError::NotFound => "session not found".to_owned(),
        SessionError::InvalidState { status } => format!("invalid session state: {status}"),
        SessionError::Database(err) => format!("database error: {err}"),
    }
}

impl std::fmt::Debug for RunLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLauncher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use jiff_diesel::Timestamp as DbTimestamp;

    use super::*;

    #[test]
    fn prompt_includes_instructions_and_context() {
        let automation = Automation {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            configuration_id: None,
            display_name: "triage".to_owned(),
            instructions: serde_json::json!({"prompt": "Triage the new issue."}),
            enabled: true,
            created_at: DbTimestamp::from(jiff::Timestamp::now()),
            updated_at: DbTimestamp::from(jiff::Timestamp::now()),
        };

        let prompt = build_prompt(&automation, &serde_json::json!({"id": "LIN-9"}));
        assert!(prompt.starts_with("Triage the new issue."));
        assert!(prompt.contains("LIN-9"));
    }
}
