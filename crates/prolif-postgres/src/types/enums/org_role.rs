//! Organization member role enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Role of an account within an organization.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::OrgRole"]
pub enum OrgRole {
    #[db_rename = "member"]
    #[serde(rename = "member")]
    #[strum(serialize = "member")]
    #[default]
    Member,

    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    #[strum(serialize = "admin")]
    Admin,

    #[db_rename = "owner"]
    #[serde(rename = "owner")]
    #[strum(serialize = "owner")]
    Owner,
}

impl OrgRole {
    /// Returns whether this role may approve or deny action invocations.
    #[inline]
    pub fn can_approve_actions(self) -> bool {
        matches!(self, OrgRole::Owner | OrgRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_cannot_approve() {
        assert!(OrgRole::Owner.can_approve_actions());
        assert!(OrgRole::Admin.can_approve_actions());
        assert!(!OrgRole::Member.can_approve_actions());
    }
}
