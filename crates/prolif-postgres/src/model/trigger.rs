//! Trigger model: registered event sources bound to automations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::triggers;
use crate::types::TriggerType;

/// A registered source that produces events for an automation.
///
/// Every enabled `scheduled` or `polling` trigger holds a live scheduler
/// registration recorded in `repeat_job_key`; disabling removes it
/// atomically with the row update.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = triggers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Trigger {
    /// Unique trigger identifier.
    pub id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Automation this trigger fires.
    pub automation_id: Uuid,
    /// Provider id (`nango`, `github-app`, `custom`, ...).
    pub provider: String,
    /// How this trigger produces events.
    pub trigger_type: TriggerType,
    /// Integration connection routed to this trigger.
    pub integration_id: Option<Uuid>,
    /// Provider-specific config, schema-validated at write time.
    pub config: serde_json::Value,
    /// Whether the trigger is live.
    pub enabled: bool,
    /// Cron cadence for polling triggers.
    pub polling_cron: Option<String>,
    /// Scheduler registration key; lifetime bound to the registration.
    pub repeat_job_key: Option<String>,
    /// When the trigger was created.
    pub created_at: Timestamp,
    /// When the trigger was last modified.
    pub updated_at: Timestamp,
}

/// Data for creating a new trigger.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = triggers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTrigger {
    /// Organization ID (required).
    pub organization_id: Uuid,
    /// Automation ID (required).
    pub automation_id: Uuid,
    /// Provider id.
    pub provider: String,
    /// Trigger type.
    pub trigger_type: TriggerType,
    /// Integration connection.
    pub integration_id: Option<Uuid>,
    /// Provider config.
    pub config: serde_json::Value,
    /// Initial enabled state.
    pub enabled: bool,
    /// Polling cadence.
    pub polling_cron: Option<String>,
}

/// Data for updating a trigger.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = triggers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateTrigger {
    /// Provider config.
    pub config: Option<serde_json::Value>,
    /// Enabled state.
    pub enabled: Option<bool>,
    /// Polling cadence.
    pub polling_cron: Option<Option<String>>,
    /// Scheduler registration key.
    pub repeat_job_key: Option<Option<String>>,
    /// Modification timestamp.
    pub updated_at: Option<Timestamp>,
}

impl Trigger {
    /// Returns whether this trigger should hold a scheduler registration.
    pub fn needs_schedule(&self) -> bool {
        self.enabled && self.trigger_type.is_repeatable()
    }

    /// Returns the cron expression driving this trigger, if any.
    ///
    /// Scheduled triggers carry it in config; polling triggers on the row.
    pub fn cron_expression(&self) -> Option<&str> {
        match self.trigger_type {
            TriggerType::Scheduled => self.config.get("cron").and_then(|v| v.as_str()),
            TriggerType::Polling => self.polling_cron.as_deref(),
            TriggerType::Webhook => None,
        }
    }

    /// Returns the stable scheduler job id for this trigger.
    pub fn schedule_job_id(&self) -> String {
        format!("scheduled-trigger-{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use jiff_diesel::Timestamp;

    use super::*;

    fn trigger(trigger_type: TriggerType, enabled: bool) -> Trigger {
        let now = Timestamp::from(jiff::Timestamp::now());
        Trigger {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            automation_id: Uuid::new_v4(),
            provider: "scheduled".to_owned(),
            trigger_type,
            integration_id: None,
            config: serde_json::json!({"cron": "0 0 * * * *"}),
            enabled,
            polling_cron: Some("*/5 * * * *".to_owned()),
            repeat_job_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn schedule_follows_type_and_enabled_state() {
        assert!(trigger(TriggerType::Scheduled, true).needs_schedule());
        assert!(trigger(TriggerType::Polling, true).needs_schedule());
        assert!(!trigger(TriggerType::Webhook, true).needs_schedule());
        assert!(!trigger(TriggerType::Scheduled, false).needs_schedule());
    }

    #[test]
    fn cron_expression_source_depends_on_type() {
        assert_eq!(
            trigger(TriggerType::Scheduled, true).cron_expression(),
            Some("0 0 * * * *")
        );
        assert_eq!(
            trigger(TriggerType::Polling, true).cron_expression(),
            Some("*/5 * * * *")
        );
        assert_eq!(trigger(TriggerType::Webhook, true).cron_expression(), None);
    }

    #[test]
    fn schedule_job_id_is_stable() {
        let trigger = trigger(TriggerType::Scheduled, true);
        assert_eq!(
            trigger.schedule_job_id(),
            format!("scheduled-trigger-{}", trigger.id)
        );
    }
}
