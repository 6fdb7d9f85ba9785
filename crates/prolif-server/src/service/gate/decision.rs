//! The pure admission decision.
//!
//! For any `(billing, counts, operation)` input the decision is
//! deterministic; every I/O concern (loading, timeouts, caching) lives in
//! the service wrapper, which fails closed.

use prolif_core::GatedOperation;
use prolif_postgres::model::OrgBilling;
use prolif_postgres::query::SessionCounts;
use prolif_postgres::types::BillingState;

/// Fallback minimum credits required to start work.
pub const DEFAULT_MIN_CREDITS_TO_START: i64 = 10;

/// Gate configuration resolved from the environment.
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Global bypass; when false every operation is allowed.
    pub billing_enabled: bool,
    /// Minimum shadow balance required in credit-gated states.
    pub min_credits_to_start: i64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            billing_enabled: true,
            min_credits_to_start: DEFAULT_MIN_CREDITS_TO_START,
        }
    }
}

/// Machine-readable denial codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDenyCode {
    /// No billing record exists (also the fail-closed code).
    BillingNotConfigured,
    /// Billing record exists but was never provisioned.
    BillingUnconfigured,
    /// Organization is hard-suspended.
    Suspended,
    /// The grace window has closed.
    GraceExpired,
    /// Shadow balance below the start threshold.
    NoCredits,
    /// Concurrent session limit reached.
    ConcurrentLimit,
}

impl GateDenyCode {
    /// Returns the wire representation of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            GateDenyCode::BillingNotConfigured => "BILLING_NOT_CONFIGURED",
            GateDenyCode::BillingUnconfigured => "BILLING_UNCONFIGURED",
            GateDenyCode::Suspended => "SUSPENDED",
            GateDenyCode::GraceExpired => "GRACE_EXPIRED",
            GateDenyCode::NoCredits => "NO_CREDITS",
            GateDenyCode::ConcurrentLimit => "CONCURRENT_LIMIT",
        }
    }
}

/// Follow-up action a denial instructs the caller to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// Running sessions must be torn down (grace expiry).
    TerminateSessions,
}

impl GateAction {
    /// Returns the wire representation of this action.
    pub fn as_str(self) -> &'static str {
        match self {
            GateAction::TerminateSessions => "terminate_sessions",
        }
    }
}

/// A denial with its code, message, and optional follow-up action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDeny {
    pub code: GateDenyCode,
    pub message: String,
    pub action: Option<GateAction>,
}

/// The admission decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny(GateDeny),
}

impl GateDecision {
    /// Returns whether the operation may proceed.
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }

    fn deny(code: GateDenyCode, message: impl Into<String>) -> Self {
        GateDecision::Deny(GateDeny {
            code,
            message: message.into(),
            action: None,
        })
    }

    fn deny_with_action(code: GateDenyCode, message: impl Into<String>, action: GateAction) -> Self {
        GateDecision::Deny(GateDeny {
            code,
            message: message.into(),
            action: Some(action),
        })
    }
}

/// Decides whether an organization may perform a gated operation.
pub fn decide(
    config: GateConfig,
    billing: Option<&OrgBilling>,
    counts: SessionCounts,
    max_concurrent_sessions: i64,
    operation: GatedOperation,
    now: jiff::Timestamp,
) -> GateDecision {
    if !config.billing_enabled {
        return GateDecision::Allow;
    }

    // Fail-closed: no record, no sessions.
    let Some(billing) = billing else {
        return GateDecision::deny(
            GateDenyCode::BillingNotConfigured,
            "Billing is not configured for this organization",
        );
    };

    match billing.billing_state {
        BillingState::Unconfigured => {
            return GateDecision::deny(
                GateDenyCode::BillingUnconfigured,
                "Billing setup has not been completed",
            );
        }
        BillingState::Suspended => {
            return GateDecision::deny(
                GateDenyCode::Suspended,
                "This organization is suspended; contact support",
            );
        }
        BillingState::Grace if billing.grace_expired_at(now) => {
            return GateDecision::deny_with_action(
                GateDenyCode::GraceExpired,
                "The payment grace period has ended",
                GateAction::TerminateSessions,
            );
        }
        BillingState::Trial | BillingState::Grace => {
            if billing.shadow_balance < config.min_credits_to_start {
                return GateDecision::deny(
                    GateDenyCode::NoCredits,
                    "Not enough credits to start a session",
                );
            }
        }
        // No balance check in the hot path; the external provider meters.
        BillingState::Active => {}
    }

    if counts.running >= max_concurrent_sessions {
        return GateDecision::deny(
            GateDenyCode::ConcurrentLimit,
            format!(
                "Concurrent session limit reached ({}/{})",
                counts.running, max_concurrent_sessions
            ),
        );
    }

    let _ = operation;
    GateDecision::Allow
}

#[cfg(test)]
mod tests {
    use jiff_diesel::Timestamp as DbTimestamp;
    use uuid::Uuid;

    use super::*;

    fn billing(state: BillingState, shadow_balance: i64) -> OrgBilling {
        let now = jiff::Timestamp::now();
        OrgBilling {
            organization_id: Uuid::new_v4(),
            billing_state: state,
            shadow_balance,
            grace_expires_at: None,
            autumn_customer_id: None,
            billing_plan: "pro".to_owned(),
            overage_enabled: false,
            overage_limit: None,
            updated_at: DbTimestamp::from(now),
        }
    }

    fn config() -> GateConfig {
        GateConfig {
            billing_enabled: true,
            min_credits_to_start: 10,
        }
    }

    const NO_SESSIONS: SessionCounts = SessionCounts {
        running: 0,
        paused: 0,
    };

    fn now() -> jiff::Timestamp {
        jiff::Timestamp::now()
    }

    #[test]
    fn billing_disabled_allows_everything() {
        let config = GateConfig {
            billing_enabled: false,
            min_credits_to_start: 10,
        };

        let decision = decide(
            config,
            None,
            NO_SESSIONS,
            1,
            GatedOperation::SessionStart,
            now(),
        );
        assert!(decision.is_allowed());
    }

    #[test]
    fn missing_record_fails_closed() {
        let decision = decide(
            config(),
            None,
            NO_SESSIONS,
            3,
            GatedOperation::SessionStart,
            now(),
        );

        let GateDecision::Deny(deny) = decision else {
            panic!("expected deny");
        };
        assert_eq!(deny.code, GateDenyCode::BillingNotConfigured);
    }

    #[test]
    fn unconfigured_and_suspended_deny() {
        for (state, code) in [
            (BillingState::Unconfigured, GateDenyCode::BillingUnconfigured),
            (BillingState::Suspended, GateDenyCode::Suspended),
        ] {
            let billing = billing(state, 1_000);
            let decision = decide(
                config(),
                Some(&billing),
                NO_SESSIONS,
                3,
                GatedOperation::SessionStart,
                now(),
            );
            let GateDecision::Deny(deny) = decision else {
                panic!("expected deny for {state:?}");
            };
            assert_eq!(deny.code, code);
        }
    }

    #[test]
    fn expired_grace_denies_with_terminate_action() {
        let mut billing = billing(BillingState::Grace, 50);
        billing.grace_expires_at = Some(DbTimestamp::from(
            now() - jiff::SignedDuration::from_secs(1),
        ));

        let decision = decide(
            config(),
            Some(&billing),
            NO_SESSIONS,
            3,
            GatedOperation::SessionStart,
            now(),
        );

        let GateDecision::Deny(deny) = decision else {
            panic!("expected deny");
        };
        assert_eq!(deny.code, GateDenyCode::GraceExpired);
        assert_eq!(deny.action, Some(GateAction::TerminateSessions));
    }

    #[test]
    fn live_grace_gates_on_shadow_balance() {
        let mut billing = billing(BillingState::Grace, 5);
        billing.grace_expires_at = Some(DbTimestamp::from(
            now() + jiff::SignedDuration::from_secs(3600),
        ));

        let decision = decide(
            config(),
            Some(&billing),
            NO_SESSIONS,
            3,
            GatedOperation::SessionStart,
            now(),
        );

        let GateDecision::Deny(deny) = decision else {
            panic!("expected deny");
        };
        assert_eq!(deny.code, GateDenyCode::NoCredits);
    }

    #[test]
    fn trial_below_threshold_denies() {
        let billing = billing(BillingState::Trial, 9);
        let decision = decide(
            config(),
            Some(&billing),
            NO_SESSIONS,
            3,
            GatedOperation::SessionStart,
            now(),
        );

        let GateDecision::Deny(deny) = decision else {
            panic!("expected deny");
        };
        assert_eq!(deny.code, GateDenyCode::NoCredits);
    }

    #[test]
    fn active_skips_balance_check() {
        let billing = billing(BillingState::Active, 0);
        let decision = decide(
            config(),
            Some(&billing),
            NO_SESSIONS,
            3,
            GatedOperation::SessionStart,
            now(),
        );
        assert!(decision.is_allowed());
    }

    #[test]
    fn concurrency_limit_denies() {
        let billing = billing(BillingState::Active, 1_000);
        let counts = SessionCounts {
            running: 3,
            paused: 1,
        };

        let decision = decide(
            config(),
            Some(&billing),
            counts,
            3,
            GatedOperation::SessionResume,
            now(),
        );

        let GateDecision::Deny(deny) = decision else {
            panic!("expected deny");
        };
        assert_eq!(deny.code, GateDenyCode::ConcurrentLimit);
    }

    #[test]
    fn decision_is_deterministic() {
        let billing = billing(BillingState::Trial, 100);
        let at = now();

        let first = decide(
            config(),
            Some(&billing),
            NO_SESSIONS,
            3,
            GatedOperation::CliConnect,
            at,
        );
        let second = decide(
            config(),
            Some(&billing),
            NO_SESSIONS,
            3,
            GatedOperation::CliConnect,
            at,
        );
        assert_eq!(first, second);
    }
}
