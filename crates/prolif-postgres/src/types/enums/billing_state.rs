//! Organization billing state enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Billing state driving session admission control.
///
/// The shadow balance is authoritative for gating in `Trial`, `Grace`, and
/// `Suspended`; the external billing provider is authoritative only in
/// `Active`.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::BillingState"]
pub enum BillingState {
    /// No billing record provisioned; sessions are denied.
    #[db_rename = "unconfigured"]
    #[serde(rename = "unconfigured")]
    #[strum(serialize = "unconfigured")]
    #[default]
    Unconfigured,

    /// Trial credits; gated on the shadow balance.
    #[db_rename = "trial"]
    #[serde(rename = "trial")]
    #[strum(serialize = "trial")]
    Trial,

    /// Paying customer; the external provider meters usage.
    #[db_rename = "active"]
    #[serde(rename = "active")]
    #[strum(serialize = "active")]
    Active,

    /// Payment failed; limited window with shadow-balance gating.
    #[db_rename = "grace"]
    #[serde(rename = "grace")]
    #[strum(serialize = "grace")]
    Grace,

    /// Hard-suspended; all session operations denied.
    #[db_rename = "suspended"]
    #[serde(rename = "suspended")]
    #[strum(serialize = "suspended")]
    Suspended,
}

impl BillingState {
    /// Returns whether gating consults the shadow balance in this state.
    #[inline]
    pub fn uses_shadow_balance(self) -> bool {
        matches!(self, BillingState::Trial | BillingState::Grace)
    }
}
