//! Database models for all entities in the system.
//!
//! Each module provides the row struct plus `New*` insert and `Update*`
//! changeset types for its table.

mod action_grant;
mod action_invocation;
mod api_token;
mod automation;
mod automation_run;
mod configuration;
mod integration;
mod org_billing;
mod org_member;
mod organization;
mod session;
mod trigger;
mod trigger_event;
mod webhook_inbox;

pub use action_grant::{ActionGrant, NewActionGrant};
pub use action_invocation::{ActionInvocation, NewActionInvocation, UpdateActionInvocation};
pub use api_token::{ApiToken, NewApiToken};
pub use automation::{Automation, NewAutomation, UpdateAutomation};
pub use automation_run::{AutomationRun, NewAutomationRun, UpdateAutomationRun};
pub use configuration::{
    Configuration, ConfigurationRepo, NewConfiguration, NewConfigurationRepo, UpdateConfiguration,
};
pub use integration::{Integration, NewIntegration};
pub use org_billing::{NewOrgBilling, OrgBilling, UpdateOrgBilling};
pub use org_member::{NewOrgMember, OrgMember};
pub use organization::{NewOrganization, Organization, UpdateOrganization};
pub use session::{NewSession, Session, UpdateSession};
pub use trigger::{NewTrigger, Trigger, UpdateTrigger};
pub use trigger_event::{NewTriggerEvent, TriggerEvent, UpdateTriggerEvent};
pub use webhook_inbox::{NewWebhookInbox, UpdateWebhookInbox, WebhookInbox};
