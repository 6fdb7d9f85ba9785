//! HTTP client for the sandbox provider service.

use std::collections::BTreeMap;

use prolif_core::{SandboxProvider, SnapshotRequest};
use serde::Deserialize;
use url::Url;

/// Tracing target for sandbox provider calls.
const TRACING_TARGET: &str = "prolif_server::service::sandbox";

/// Reqwest-backed [`SandboxProvider`] for the Modal-based sandbox service.
#[derive(Debug, Clone)]
pub struct ModalSandboxProvider {
    base_url: Url,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotResponse {
    snapshot_id: String,
}

impl ModalSandboxProvider {
    /// Creates a provider client.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> prolif_core::Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| prolif_core::Error::sandbox("modal", e.to_string()))
    }
}

#[async_trait::async_trait]
impl SandboxProvider for ModalSandboxProvider {
    fn id(&self) -> &'static str {
        "modal"
    }

    fn supports_snapshots(&self) -> bool {
        true
    }

    async fn create_configuration_snapshot(
        &self,
        request: SnapshotRequest,
    ) -> prolif_core::Result<String> {
        let url = self.endpoint(&format!(
            "configurations/{}/snapshots",
            request.configuration_id
        ))?;

        tracing::info!(
            target: TRACING_TARGET,
            configuration_id = %request.configuration_id,
            repos = request.repos.len(),
            "Requesting configuration snapshot build"
        );

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| prolif_core::Error::sandbox("modal", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(prolif_core::Error::sandbox(
                "modal",
                format!("snapshot build returned {status}: {body}"),
            ));
        }

        let snapshot: SnapshotResponse = response
            .json()
            .await
            .map_err(|e| prolif_core::Error::sandbox("modal", e.to_string()))?;

        Ok(snapshot.snapshot_id)
    }

    async fn write_env_file(
        &self,
        sandbox_id: &str,
        env: &BTreeMap<String, String>,
    ) -> prolif_core::Result<()> {
        let url = self.endpoint(&format!("sandboxes/{sandbox_id}/env"))?;

        let response = self
            .client
            .post(url)
            .json(env)
            .send()
            .await
            .map_err(|e| prolif_core::Error::sandbox("modal", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(prolif_core::Error::sandbox(
                "modal",
                format!("env write returned {status}"),
            ));
        }

        Ok(())
    }
}
