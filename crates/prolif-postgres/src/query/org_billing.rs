//! Organization billing repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::model::{NewOrgBilling, OrgBilling, UpdateOrgBilling};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for billing records.
///
/// The admission gate is the read-mostly consumer; writes come from the
/// billing event handlers outside the runtime core.
pub trait OrgBillingRepository {
    /// Inserts a billing record.
    fn create_org_billing(
        &mut self,
        new_billing: NewOrgBilling,
    ) -> impl Future<Output = PgResult<OrgBilling>> + Send;

    /// Finds the billing record for an organization.
    fn find_org_billing(
        &mut self,
        organization_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<OrgBilling>>> + Send;

    /// Applies an update to a billing record.
    fn update_org_billing(
        &mut self,
        organization_id: Uuid,
        updates: UpdateOrgBilling,
    ) -> impl Future<Output = PgResult<OrgBilling>> + Send;

    /// Adjusts the shadow balance by a signed delta, returning the record.
    fn adjust_shadow_balance(
        &mut self,
        organization_id: Uuid,
        delta: i64,
    ) -> impl Future<Output = PgResult<OrgBilling>> + Send;
}

impl OrgBillingRepository for PgConnection {
    async fn create_org_billing(&mut self, new_billing: NewOrgBilling) -> PgResult<OrgBilling> {
        use schema::org_billing;

        let billing = diesel::insert_into(org_billing::table)
            .values(&new_billing)
            .returning(OrgBilling::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(billing)
    }

    async fn find_org_billing(&mut self, organization_id: Uuid) -> PgResult<Option<OrgBilling>> {
        use schema::org_billing::{self, dsl};

        let billing = org_billing::table
            .filter(dsl::organization_id.eq(organization_id))
            .select(OrgBilling::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(billing)
    }

    async fn update_org_billing(
        &mut self,
        organization_id: Uuid,
        mut updates: UpdateOrgBilling,
    ) -> PgResult<OrgBilling> {
        use schema::org_billing::dsl;

        updates.updated_at = Some(Timestamp::from(jiff::Timestamp::now()));

        let billing =
            diesel::update(dsl::org_billing.filter(dsl::organization_id.eq(organization_id)))
                .set(&updates)
                .returning(OrgBilling::as_returning())
                .get_result(self)
                .await
                .map_err(PgError::from)?;

        Ok(billing)
    }

    async fn adjust_shadow_balance(
        &mut self,
        organization_id: Uuid,
        delta: i64,
    ) -> PgResult<OrgBilling> {
        use schema::org_billing::dsl;

        let billing =
            diesel::update(dsl::org_billing.filter(dsl::organization_id.eq(organization_id)))
                .set((
                    dsl::shadow_balance.eq(dsl::shadow_balance + delta),
                    dsl::updated_at.eq(Timestamp::from(jiff::Timestamp::now())),
                ))
                .returning(OrgBilling::as_returning())
                .get_result(self)
                .await
                .map_err(PgError::from)?;

        Ok(billing)
    }
}
