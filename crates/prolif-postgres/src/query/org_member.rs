//! Organization membership repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewOrgMember, OrgMember};
use crate::types::OrgRole;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for organization memberships.
pub trait OrgMemberRepository {
    /// Inserts a membership.
    fn create_org_member(
        &mut self,
        new_member: NewOrgMember,
    ) -> impl Future<Output = PgResult<OrgMember>> + Send;

    /// Resolves an account's role within an organization.
    fn find_member_role(
        &mut self,
        organization_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<OrgRole>>> + Send;
}

impl OrgMemberRepository for PgConnection {
    async fn create_org_member(&mut self, new_member: NewOrgMember) -> PgResult<OrgMember> {
        use schema::org_members;

        let member = diesel::insert_into(org_members::table)
            .values(&new_member)
            .returning(OrgMember::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(member)
    }

    async fn find_member_role(
        &mut self,
        organization_id: Uuid,
        account_id: Uuid,
    ) -> PgResult<Option<OrgRole>> {
        use schema::org_members::{self, dsl};

        let role = org_members::table
            .filter(dsl::organization_id.eq(organization_id))
            .filter(dsl::account_id.eq(account_id))
            .select(dsl::role)
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(role)
    }
}
