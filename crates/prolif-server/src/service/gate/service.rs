//! The fail-closed gate service.

use std::time::Duration;

use prolif_core::GatedOperation;
use prolif_postgres::PgConnection;
use prolif_postgres::model::{OrgBilling, Organization};
use prolif_postgres::query::{SessionCounts, SessionRepository};
use uuid::Uuid;

use super::decision::{GateConfig, GateDecision, GateDeny, GateDenyCode, decide};

/// Tracing target for gate decisions.
const TRACING_TARGET: &str = "prolif_server::service::gate";

/// Per-probe deadline; a slow database is a denial, not a pass.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// The single authoritative decision point for session admission.
///
/// Every error path — missing record, query failure, timeout — denies.
/// The gate reads the locally stored shadow balance and never calls the
/// external billing provider.
#[derive(Debug, Clone)]
pub struct SessionGate {
    config: GateConfig,
}

impl SessionGate {
    /// Creates a gate with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Returns the gate configuration.
    pub fn config(&self) -> GateConfig {
        self.config
    }

    /// Checks whether an organization may perform a gated operation.
    #[tracing::instrument(skip_all, fields(organization_id = %organization_id, operation = %operation))]
    pub async fn check(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        operation: GatedOperation,
    ) -> GateDecision {
        if !self.config.billing_enabled {
            return GateDecision::Allow;
        }

        let probes = tokio::time::timeout(
            PROBE_TIMEOUT,
            load_probes(conn, organization_id),
        )
        .await;

        let (billing, counts, organization) = match probes {
            Ok(Ok(loaded)) => loaded,
            Ok(Err(err)) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Gate probe failed; denying"
                );
                return fail_closed();
            }
            Err(_) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    timeout = ?PROBE_TIMEOUT,
                    "Gate probe timed out; denying"
                );
                return fail_closed();
            }
        };

        let max_concurrent = organization
            .as_ref()
            .map(|org| i64::from(org.max_concurrent_sessions))
            .unwrap_or(i64::from(
                prolif_postgres::types::DEFAULT_MAX_CONCURRENT_SESSIONS,
            ));

        let decision = decide(
            self.config,
            billing.as_ref(),
            counts,
            max_concurrent,
            operation,
            jiff::Timestamp::now(),
        );

        if let GateDecision::Deny(deny) = &decision {
            tracing::info!(
                target: TRACING_TARGET,
                code = deny.code.as_str(),
                running = counts.running,
                "Gate denied operation"
            );
        }

        decision
    }
}

async fn load_probes(
    conn: &mut PgConnection,
    organization_id: Uuid,
) -> prolif_postgres::PgResult<(Option<OrgBilling>, SessionCounts, Option<Organization>)> {
    use prolif_postgres::query::{OrgBillingRepository, OrganizationRepository};

    let billing = conn.find_org_billing(organization_id).await?;
    let counts = conn.count_org_sessions(organization_id).await?;
    let organization = conn.find_organization_by_id(organization_id).await?;

    Ok((billing, counts, organization))
}

fn fail_closed() -> GateDecision {
    GateDecision::Deny(GateDeny {
        code: GateDenyCode::BillingNotConfigured,
        message: "Billing state could not be verified".to_owned(),
        action: None,
    })
}
