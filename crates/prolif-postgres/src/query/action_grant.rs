//! Action grant repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{ActionGrant, NewActionGrant};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for reusable approval grants.
pub trait ActionGrantRepository {
    /// Records a new grant.
    fn create_action_grant(
        &mut self,
        new_grant: NewActionGrant,
    ) -> impl Future<Output = PgResult<ActionGrant>> + Send;

    /// Finds a grant with remaining calls covering a session/scope pair.
    fn find_open_action_grant(
        &mut self,
        session_id: Uuid,
        scope: &str,
    ) -> impl Future<Output = PgResult<Option<ActionGrant>>> + Send;

    /// Consumes one call from a grant.
    ///
    /// The increment is guarded by `used_calls < max_calls`; a raced-out
    /// consume returns `None` and the caller falls back to manual approval.
    fn consume_action_grant(
        &mut self,
        grant_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ActionGrant>>> + Send;
}

impl ActionGrantRepository for PgConnection {
    async fn create_action_grant(&mut self, new_grant: NewActionGrant) -> PgResult<ActionGrant> {
        use schema::action_grants;

        let grant = diesel::insert_into(action_grants::table)
            .values(&new_grant)
            .returning(ActionGrant::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(grant)
    }

    async fn find_open_action_grant(
        &mut self,
        session_id: Uuid,
        scope: &str,
    ) -> PgResult<Option<ActionGrant>> {
        use schema::action_grants::{self, dsl};

        let grant = action_grants::table
            .filter(dsl::session_id.eq(session_id))
            .filter(dsl::scope.eq(scope))
            .filter(dsl::used_calls.lt(dsl::max_calls))
            .order(dsl::created_at.desc())
            .select(ActionGrant::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(grant)
    }

    async fn consume_action_grant(&mut self, grant_id: Uuid) -> PgResult<Option<ActionGrant>> {
        use schema::action_grants::dsl;

        let grant = diesel::update(
            dsl::action_grants
                .filter(dsl::id.eq(grant_id))
                .filter(dsl::used_calls.lt(dsl::max_calls)),
        )
        .set(dsl::used_calls.eq(dsl::used_calls + 1))
        .returning(ActionGrant::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)?;

        Ok(grant)
    }
}
