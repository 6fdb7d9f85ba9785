//! Configuration snapshot builds.

use prolif_core::{RuntimeServices, SnapshotRepo, SnapshotRequest};
use prolif_postgres::PgConnection;
use prolif_postgres::model::ConfigurationRepo;
use prolif_postgres::query::ConfigurationRepository;
use prolif_postgres::types::ConfigurationStatus;
use uuid::Uuid;

use crate::{Error, Result};

/// Tracing target for snapshot builds.
const TRACING_TARGET: &str = "prolif_server::service::snapshot";

/// Outcome of a snapshot build job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// A snapshot was built and stored.
    Built { snapshot_id: String },
    /// The configuration already had a usable snapshot.
    AlreadyBuilt,
    /// The provider has no snapshot concept; marked usable without one.
    NotSupported,
    /// The configuration no longer exists.
    Missing,
}

/// Builds reusable sandbox base images per configuration.
#[derive(Clone)]
pub struct SnapshotBuilder {
    services: RuntimeServices,
    github_token: Option<String>,
}

impl SnapshotBuilder {
    /// Creates a builder over the sandbox provider registry.
    pub fn new(services: RuntimeServices, github_token: Option<String>) -> Self {
        Self {
            services,
            github_token,
        }
    }

    /// Builds the snapshot for a configuration, idempotently.
    ///
    /// Re-raises provider failures after marking the configuration
    /// `failed`, so the queue's retry policy applies.
    #[tracing::instrument(skip_all, fields(configuration_id = %configuration_id, force = force))]
    pub async fn build(
        &self,
        conn: &mut PgConnection,
        configuration_id: Uuid,
        force: bool,
    ) -> Result<SnapshotOutcome> {
        let Some(configuration) = conn.find_configuration_by_id(configuration_id).await? else {
            tracing::warn!(target: TRACING_TARGET, "Configuration gone; dropping build");
            return Ok(SnapshotOutcome::Missing);
        };

        if configuration.has_usable_snapshot() && !force {
            tracing::debug!(target: TRACING_TARGET, "Snapshot already built");
            return Ok(SnapshotOutcome::AlreadyBuilt);
        }

        // A provider we cannot reach for snapshots has no snapshot concept
        // from the runtime's point of view; the configuration is usable
        // as-is and sessions boot from scratch.
        let Some(provider) = self.services.sandbox(&configuration.sandbox_provider) else {
            conn.store_configuration_snapshot(
                configuration_id,
                None,
                ConfigurationStatus::Default,
            )
            .await?;

            tracing::info!(
                target: TRACING_TARGET,
                provider = %configuration.sandbox_provider,
                "No snapshot support for provider; configuration marked usable"
            );
            return Ok(SnapshotOutcome::NotSupported);
        };

        if !provider.supports_snapshots() {
            conn.store_configuration_snapshot(
                configuration_id,
                None,
                ConfigurationStatus::Default,
            )
            .await?;

            tracing::info!(
                target: TRACING_TARGET,
                provider = provider.id(),
                "Provider has no snapshot concept; configuration marked usable"
            );
            return Ok(SnapshotOutcome::NotSupported);
        }

        conn.mark_configuration_building(configuration_id).await?;

        let repos = conn.list_configuration_repos(configuration_id).await?;
        let snapshot_repos = match self.resolve_repos(&repos) {
            Ok(snapshot_repos) => snapshot_repos,
            Err(message) => {
                conn.fail_configuration(configuration_id, &message).await?;
                return Err(Error::config(message));
            }
        };

        let request = SnapshotRequest {
            configuration_id,
            repos: snapshot_repos,
        };

        match provider.create_configuration_snapshot(request).await {
            Ok(snapshot_id) => {
                conn.store_configuration_snapshot(
                    configuration_id,
                    Some(snapshot_id.clone()),
                    ConfigurationStatus::Default,
                )
                .await?;

                tracing::info!(
                    target: TRACING_TARGET,
                    snapshot_id = %snapshot_id,
                    "Snapshot built"
                );
                Ok(SnapshotOutcome::Built { snapshot_id })
            }
            Err(err) => {
                conn.fail_configuration(configuration_id, &err.to_string())
                    .await?;
                Err(err.into())
            }
        }
    }

    /// Resolves tokens for the repo set; private repos without a token are
    /// an explicit failure, not a silent public clone attempt.
    fn resolve_repos(&self, repos: &[ConfigurationRepo]) -> Result<Vec<SnapshotRepo>, String> {
        repos
            .iter()
            .map(|repo| {
                let token = if repo.is_private {
                    match &self.github_token {
                        Some(token) => Some(token.clone()),
                        None => {
                            return Err(format!(
                                "repository '{}' is private and no GitHub token is configured",
                                repo.repo_url
                            ));
                        }
                    }
                } else {
                    None
                };

                Ok(SnapshotRepo {
                    url: repo.repo_url.clone(),
                    token,
                    workspace_path: repo.workspace_path.clone(),
                    branch: repo.branch.clone(),
                })
            })
            .collect()
    }

}

impl std::fmt::Debug for SnapshotBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotBuilder")
            .field("has_github_token", &self.github_token.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(private: bool) -> ConfigurationRepo {
        ConfigurationRepo {
            id: Uuid::new_v4(),
            configuration_id: Uuid::new_v4(),
            repo_url: "https://github.com/acme/api".to_owned(),
            branch: "main".to_owned(),
            workspace_path: "api".to_owned(),
            is_private: private,
        }
    }

    fn builder(token: Option<&str>) -> SnapshotBuilder {
        use std::sync::Arc;

        use prolif_core::{CreateSessionInput, CreatedSession, SessionGateway, UpdateSessionPatch};

        struct NoopGateway;

        #[async_trait::async_trait]
        impl SessionGateway for NoopGateway {
            async fn create_session(
                &self,
                _input: CreateSessionInput,
            ) -> prolif_core::Result<CreatedSession> {
                unreachable!("not exercised")
            }

            async fn update_session(
                &self,
                _session_id: Uuid,
                _patch: UpdateSessionPatch,
            ) -> prolif_core::Result<()> {
                unreachable!("not exercised")
            }
        }

        SnapshotBuilder::new(
            RuntimeServices::new(Arc::new(NoopGateway)),
            token.map(str::to_owned),
        )
    }

    #[test]
    fn private_repo_without_token_fails_explicitly() {
        let error = builder(None).resolve_repos(&[repo(true)]).unwrap_err();
        assert!(error.contains("private"));
    }

    #[test]
    fn private_repo_with_token_resolves() {
        let repos = builder(Some("ghs_token"))
            .resolve_repos(&[repo(true), repo(false)])
            .unwrap();
        assert_eq!(repos[0].token.as_deref(), Some("ghs_token"));
        assert_eq!(repos[1].token, None);
    }
}
