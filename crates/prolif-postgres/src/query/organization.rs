//! Organization repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewOrganization, Organization};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for organizations.
pub trait OrganizationRepository {
    /// Inserts a new organization.
    fn create_organization(
        &mut self,
        new_organization: NewOrganization,
    ) -> impl Future<Output = PgResult<Organization>> + Send;

    /// Finds an organization by id.
    fn find_organization_by_id(
        &mut self,
        organization_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Organization>>> + Send;
}

impl OrganizationRepository for PgConnection {
    async fn create_organization(
        &mut self,
        new_organization: NewOrganization,
    ) -> PgResult<Organization> {
        use schema::organizations;

        let organization = diesel::insert_into(organizations::table)
            .values(&new_organization)
            .returning(Organization::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(organization)
    }

    async fn find_organization_by_id(
        &mut self,
        organization_id: Uuid,
    ) -> PgResult<Option<Organization>> {
        use schema::organizations::{self, dsl};

        let organization = organizations::table
            .filter(dsl::id.eq(organization_id))
            .select(Organization::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(organization)
    }
}
