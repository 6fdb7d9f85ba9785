//! API token repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{ApiToken, NewApiToken};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for bearer tokens.
pub trait ApiTokenRepository {
    /// Mints a new token.
    fn create_api_token(
        &mut self,
        new_token: NewApiToken,
    ) -> impl Future<Output = PgResult<ApiToken>> + Send;

    /// Resolves an unrevoked token by its opaque value.
    fn find_active_api_token(
        &mut self,
        token: &str,
    ) -> impl Future<Output = PgResult<Option<ApiToken>>> + Send;
}

impl ApiTokenRepository for PgConnection {
    async fn create_api_token(&mut self, new_token: NewApiToken) -> PgResult<ApiToken> {
        use schema::api_tokens;

        let token = diesel::insert_into(api_tokens::table)
            .values(&new_token)
            .returning(ApiToken::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(token)
    }

    async fn find_active_api_token(&mut self, token: &str) -> PgResult<Option<ApiToken>> {
        use schema::api_tokens::{self, dsl};

        let api_token = api_tokens::table
            .filter(dsl::token.eq(token))
            .filter(dsl::revoked_at.is_null())
            .select(ApiToken::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(api_token)
    }
}
