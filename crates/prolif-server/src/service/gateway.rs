//! HTTP client for the session gateway service.

use prolif_core::{CreateSessionInput, CreatedSession, SessionGateway, UpdateSessionPatch};
use url::Url;
use uuid::Uuid;

/// Tracing target for gateway calls.
const TRACING_TARGET: &str = "prolif_server::service::gateway";

/// Reqwest-backed [`SessionGateway`] implementation.
#[derive(Debug, Clone)]
pub struct HttpSessionGateway {
    base_url: Url,
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl HttpSessionGateway {
    /// Creates a gateway client.
    pub fn new(base_url: Url, auth_token: Option<String>) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
            auth_token,
        }
    }

    fn endpoint(&self, path: &str) -> prolif_core::Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| prolif_core::Error::gateway("endpoint", e.to_string()))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl SessionGateway for HttpSessionGateway {
    async fn create_session(
        &self,
        input: CreateSessionInput,
    ) -> prolif_core::Result<CreatedSession> {
        let url = self.endpoint("sessions")?;

        tracing::debug!(
            target: TRACING_TARGET,
            organization_id = %input.organization_id,
            client_type = %input.client_type,
            "Creating session via gateway"
        );

        let response = self
            .authorize(self.client.post(url))
            .json(&input)
            .send()
            .await
            .map_err(|e| prolif_core::Error::gateway("create_session", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(prolif_core::Error::gateway(
                "create_session",
                format!("gateway returned {status}: {body}"),
            ));
        }

        let created: CreatedSession = response
            .json()
            .await
            .map_err(|e| prolif_core::Error::gateway("create_session", e.to_string()))?;

        tracing::info!(
            target: TRACING_TARGET,
            session_id = %created.session_id,
            sandbox_id = ?created.sandbox_id,
            "Gateway created session"
        );

        Ok(created)
    }

    async fn update_session(
        &self,
        session_id: Uuid,
        patch: UpdateSessionPatch,
    ) -> prolif_core::Result<()> {
        let url = self.endpoint(&format!("sessions/{session_id}"))?;

        let response = self
            .authorize(self.client.patch(url))
            .json(&patch)
            .send()
            .await
            .map_err(|e| prolif_core::Error::gateway("update_session", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(prolif_core::Error::gateway(
                "update_session",
                format!("gateway returned {status}"),
            ));
        }

        Ok(())
    }
}
