//! Structured constraint violations for known database constraints.

/// Known database constraint violations, resolved from constraint names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    TriggerEvent(TriggerEventConstraints),
    ApiToken(ApiTokenConstraints),
    Integration(IntegrationConstraints),
    ActionGrant(ActionGrantConstraints),
    Organization(OrganizationConstraints),
}

/// Trigger event table constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEventConstraints {
    /// `(trigger_id, dedup_key)` uniqueness — the authoritative dedup
    /// boundary for external events.
    TriggerDedupUnique,
}

/// API token table constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenConstraints {
    TokenUnique,
}

/// Integration table constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationConstraints {
    ProviderConnectionUnique,
}

/// Action grant table constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionGrantConstraints {
    CallsBounds,
    MaxCallsMin,
}

/// Organization table constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizationConstraints {
    MaxConcurrentSessionsMin,
}

impl ConstraintViolation {
    /// Resolves a Postgres constraint name into a structured violation.
    pub fn new(constraint_name: &str) -> Option<Self> {
        match constraint_name {
            "trigger_events_trigger_dedup_unique" => Some(Self::TriggerEvent(
                TriggerEventConstraints::TriggerDedupUnique,
            )),
            "api_tokens_token_unique" => Some(Self::ApiToken(ApiTokenConstraints::TokenUnique)),
            "integrations_provider_connection_unique" => Some(Self::Integration(
                IntegrationConstraints::ProviderConnectionUnique,
            )),
            "action_grants_calls_bounds" => {
                Some(Self::ActionGrant(ActionGrantConstraints::CallsBounds))
            }
            "action_grants_max_calls_min" => {
                Some(Self::ActionGrant(ActionGrantConstraints::MaxCallsMin))
            }
            "organizations_max_concurrent_sessions_min" => Some(Self::Organization(
                OrganizationConstraints::MaxConcurrentSessionsMin,
            )),
            _ => None,
        }
    }

    /// Returns whether this violation is the trigger-event dedup boundary.
    #[inline]
    pub fn is_dedup_conflict(self) -> bool {
        matches!(
            self,
            Self::TriggerEvent(TriggerEventConstraints::TriggerDedupUnique)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_dedup_constraint() {
        let violation = ConstraintViolation::new("trigger_events_trigger_dedup_unique").unwrap();
        assert!(violation.is_dedup_conflict());
    }

    #[test]
    fn unknown_constraints_resolve_to_none() {
        assert_eq!(ConstraintViolation::new("no_such_constraint"), None);
    }
}
