//! Session lifecycle service.
//!
//! Every path that can put work on a sandbox goes through the gate first.
//! The gateway allocates sandboxes and assigns session ids; this service
//! records the outcome in the registry and keeps the sandbox/status
//! coupling intact.

use prolif_core::{ClientSource, CreateSessionInput, GatedOperation, RuntimeServices};
use prolif_postgres::model::{NewSession, Session};
use prolif_postgres::query::SessionRepository;
use prolif_postgres::types::SessionStatus;
use prolif_postgres::{PgConnection, PgError};
use uuid::Uuid;

use crate::service::gate::{GateAction, GateDecision, GateDeny, SessionGate};

/// Tracing target for session lifecycle operations.
const TRACING_TARGET: &str = "prolif_server::service::sessions";

/// Pause reason recorded during gate-mandated teardown.
const GRACE_EXPIRED_REASON: &str = "grace_expired";

/// Pause reason while the gateway is re-establishing a sandbox.
const RESUMING_REASON: &str = "resuming";

/// Errors from session lifecycle operations.
#[derive(Debug)]
pub enum SessionError {
    /// The admission gate denied the operation.
    Gate(GateDeny),
    /// The gateway call failed.
    Gateway(prolif_core::Error),
    /// No such session.
    NotFound,
    /// The session is not in a state accepting this operation.
    InvalidState { status: SessionStatus },
    /// Underlying database failure.
    Database(PgError),
}

impl From<PgError> for SessionError {
    fn from(error: PgError) -> Self {
        Self::Database(error)
    }
}

impl From<prolif_core::Error> for SessionError {
    fn from(error: prolif_core::Error) -> Self {
        Self::Gateway(error)
    }
}

/// Input for starting a session.
#[derive(Debug, Clone)]
pub struct StartSessionInput {
    pub organization_id: Uuid,
    pub configuration_id: Option<Uuid>,
    pub client_type: ClientSource,
    pub client_metadata: serde_json::Value,
    pub prompt: Option<String>,
    pub automation_id: Option<Uuid>,
    pub trigger_event_id: Option<Uuid>,
    pub sandbox_provider: String,
}

/// Session lifecycle service.
#[derive(Clone)]
pub struct SessionService {
    gate: SessionGate,
    services: RuntimeServices,
}

impl SessionService {
    /// Creates a lifecycle service.
    pub fn new(gate: SessionGate, services: RuntimeServices) -> Self {
        Self { gate, services }
    }

    /// Starts a new session after passing the admission gate.
    #[tracing::instrument(skip_all, fields(organization_id = %input.organization_id))]
    pub async fn start(
        &self,
        conn: &mut PgConnection,
        input: StartSessionInput,
    ) -> Result<Session, SessionError> {
        self.admit(conn, input.organization_id, GatedOperation::SessionStart)
            .await?;

        let created = self
            .services
            .gateway()
            .create_session(CreateSessionInput {
                organization_id: input.organization_id,
                automation_id: input.automation_id,
                trigger_event_id: input.trigger_event_id,
                configuration_id: input.configuration_id,
                client_type: input.client_type,
                client_metadata: input.client_metadata.clone(),
                prompt: input.prompt.clone(),
            })
            .await?;

        // Lazily-allocating providers report the sandbox later through the
        // registry update surface; until then the session rests sandbox-free.
        let (status, pause_reason) = match &created.sandbox_id {
            Some(_) => (SessionStatus::Starting, None),
            None => (SessionStatus::Paused, Some("sandbox_pending".to_owned())),
        };

        let mut session = conn
            .create_session(NewSession {
                id: created.session_id,
                organization_id: input.organization_id,
                configuration_id: input.configuration_id,
                sandbox_id: created.sandbox_id,
                sandbox_provider: input.sandbox_provider,
                status,
                client_type: Some(input.client_type.into()),
                client_metadata: input.client_metadata,
                snapshot_id: None,
            })
            .await?;

        if let Some(reason) = pause_reason {
            session = conn
                .release_session(session.id, SessionStatus::Paused, Some(reason))
                .await?;
        }

        self.seed_sandbox_env(&session).await;

        tracing::info!(
            target: TRACING_TARGET,
            session_id = %session.id,
            client_type = %input.client_type,
            status = %session.status,
            "Session started"
        );

        Ok(session)
    }

    /// Resumes a paused session after passing the admission gate.
    ///
    /// The gateway re-establishes the sandbox asynchronously and reports
    /// it through the registry update surface; until then the session
    /// stays paused with a `resuming` marker.
    #[tracing::instrument(skip_all, fields(session_id = %session_id))]
    pub async fn resume(
        &self,
        conn: &mut PgConnection,
        session_id: Uuid,
    ) -> Result<Session, SessionError> {
        let session = conn
            .find_session_by_id(session_id)
            .await?
            .ok_or(SessionError::NotFound)?;

        if !session.status.is_paused() {
            return Err(SessionError::InvalidState {
                status: session.status,
            });
        }

        self.admit(conn, session.organization_id, GatedOperation::SessionResume)
            .await?;

        self.services
            .gateway()
            .update_session(
                session_id,
                prolif_core::UpdateSessionPatch {
                    status: Some("resuming".to_owned()),
                    ..Default::default()
                },
            )
            .await?;

        let session = conn
            .release_session(session_id, SessionStatus::Paused, Some(RESUMING_REASON.to_owned()))
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            session_id = %session_id,
            "Session resume requested"
        );

        Ok(session)
    }

    /// Pauses a sandbox-holding session, releasing its sandbox.
    #[tracing::instrument(skip_all, fields(session_id = %session_id))]
    pub async fn pause(
        &self,
        conn: &mut PgConnection,
        session_id: Uuid,
        reason: Option<String>,
    ) -> Result<Session, SessionError> {
        let session = conn
            .find_session_by_id(session_id)
            .await?
            .ok_or(SessionError::NotFound)?;

        if !session.status.holds_sandbox() {
            return Err(SessionError::InvalidState {
                status: session.status,
            });
        }

        self.services
            .gateway()
            .update_session(
                session_id,
                prolif_core::UpdateSessionPatch {
                    status: Some("paused".to_owned()),
                    pause_reason: reason.clone(),
                    ..Default::default()
                },
            )
            .await?;

        let session = conn
            .release_session(session_id, SessionStatus::Paused, reason)
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            session_id = %session_id,
            "Session paused"
        );

        Ok(session)
    }

    /// Writes session identity into a freshly allocated sandbox.
    ///
    /// Best-effort: the session loop re-reads identity from the gateway,
    /// so a failed seed degrades, it does not break.
    async fn seed_sandbox_env(&self, session: &prolif_postgres::model::Session) {
        let Some(sandbox_id) = session.sandbox_id.as_deref() else {
            return;
        };
        let Some(provider) = self.services.sandbox(&session.sandbox_provider) else {
            return;
        };

        let env = std::collections::BTreeMap::from([
            ("PROLIFERATE_SESSION_ID".to_owned(), session.id.to_string()),
            (
                "PROLIFERATE_ORGANIZATION_ID".to_owned(),
                session.organization_id.to_string(),
            ),
        ]);

        if let Err(err) = provider.write_env_file(sandbox_id, &env).await {
            tracing::warn!(
                target: TRACING_TARGET,
                session_id = %session.id,
                error = %err,
                "Failed to seed sandbox env"
            );
        }
    }

    /// Runs the gate and performs mandated teardown on expiry denials.
    async fn admit(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        operation: GatedOperation,
    ) -> Result<(), SessionError> {
        match self.gate.check(conn, organization_id, operation).await {
            GateDecision::Allow => Ok(()),
            GateDecision::Deny(deny) => {
                if deny.action == Some(GateAction::TerminateSessions) {
                    let released = conn
                        .release_org_active_sessions(
                            organization_id,
                            SessionStatus::Paused,
                            GRACE_EXPIRED_REASON,
                        )
                        .await?;

                    tracing::warn!(
                        target: TRACING_TARGET,
                        organization_id = %organization_id,
                        released = released,
                        "Grace expired; tore down active sessions"
                    );
                }

                Err(SessionError::Gate(deny))
            }
        }
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService").finish_non_exhaustive()
    }
}
