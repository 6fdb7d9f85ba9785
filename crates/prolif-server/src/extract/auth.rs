//! Bearer authentication extractor.
//!
//! Tokens are opaque values resolved against the `api_tokens` table; the
//! service principal authenticates with the configured
//! service-to-service token and carries no organization scope.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use prolif_postgres::query::{ApiTokenRepository, OrgMemberRepository};
use prolif_postgres::types::{ApiTokenKind, OrgRole};
use prolif_postgres::PgClient;
use uuid::Uuid;

use crate::handler::{Error, ErrorKind};

/// Tracing target for authentication.
const TRACING_TARGET: &str = "prolif_server::extract::auth";

/// The configured service-to-service bearer token.
#[derive(Debug, Clone)]
pub struct ServiceAuthToken(pub Option<String>);

/// Authenticated principal state.
///
/// Extraction guarantees the token is active; role resolution is only
/// performed for interactive user principals.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// Account the token authenticates; nil for the service principal.
    pub account_id: Uuid,
    /// Organization scope; nil for the service principal.
    pub organization_id: Uuid,
    /// Role within the organization, for user principals with membership.
    pub role: Option<OrgRole>,
    /// Principal class.
    pub kind: ApiTokenKind,
}

impl AuthState {
    /// Returns whether this principal is an interactive human user.
    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.kind.is_interactive()
    }

    /// Returns whether this principal may approve or deny actions.
    pub fn can_approve_actions(&self) -> bool {
        self.is_interactive() && self.role.is_some_and(|role| role.can_approve_actions())
    }

    /// Ensures the principal is scoped to the given organization.
    pub fn authorize_org(&self, organization_id: Uuid) -> Result<(), Error<'static>> {
        if self.kind == ApiTokenKind::Service || self.organization_id == organization_id {
            Ok(())
        } else {
            Err(ErrorKind::Forbidden
                .with_message("You don't have access to this organization")
                .into_static())
        }
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    PgClient: FromRef<S>,
    ServiceAuthToken: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ErrorKind::MissingAuthToken
                        .with_message("Provide a bearer token in the Authorization header")
                        .into_static()
                })?;

        let token = bearer.token();
        if token.is_empty() {
            return Err(ErrorKind::MalformedAuthToken.into_error());
        }

        // Service principal short-circuits the database.
        let ServiceAuthToken(service_token) = ServiceAuthToken::from_ref(state);
        if service_token.as_deref() == Some(token) {
            return Ok(AuthState {
                account_id: Uuid::nil(),
                organization_id: Uuid::nil(),
                role: None,
                kind: ApiTokenKind::Service,
            });
        }

        let pg_client = PgClient::from_ref(state);
        let mut conn = pg_client.get_connection().await.map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "Auth connection failed");
            ErrorKind::InternalServerError.into_error()
        })?;

        let Some(api_token) = conn.find_active_api_token(token).await.map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "Token lookup failed");
            ErrorKind::InternalServerError.into_error()
        })?
        else {
            return Err(ErrorKind::Unauthorized.into_error());
        };

        let role = if api_token.kind.is_interactive() {
            conn.find_member_role(api_token.organization_id, api_token.account_id)
                .await
                .map_err(|e| {
                    tracing::error!(target: TRACING_TARGET, error = %e, "Role lookup failed");
                    ErrorKind::InternalServerError.into_error()
                })?
        } else {
            None
        };

        Ok(AuthState {
            account_id: api_token.account_id,
            organization_id: api_token.organization_id,
            role,
            kind: api_token.kind,
        })
    }
}

impl aide::OperationInput for AuthState {}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_state(role: Option<OrgRole>) -> AuthState {
        AuthState {
            account_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            role,
            kind: ApiTokenKind::User,
        }
    }

    #[test]
    fn member_cannot_approve() {
        assert!(user_state(Some(OrgRole::Owner)).can_approve_actions());
        assert!(user_state(Some(OrgRole::Admin)).can_approve_actions());
        assert!(!user_state(Some(OrgRole::Member)).can_approve_actions());
        assert!(!user_state(None).can_approve_actions());
    }

    #[test]
    fn sandbox_principal_cannot_approve() {
        let state = AuthState {
            kind: ApiTokenKind::Sandbox,
            ..user_state(Some(OrgRole::Owner))
        };
        assert!(!state.can_approve_actions());
    }

    #[test]
    fn org_scoping() {
        let state = user_state(Some(OrgRole::Member));
        assert!(state.authorize_org(state.organization_id).is_ok());
        assert!(state.authorize_org(Uuid::new_v4()).is_err());
    }
}
