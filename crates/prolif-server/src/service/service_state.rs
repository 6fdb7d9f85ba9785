//! Application state and dependency injection.

use std::sync::Arc;

use prolif_core::{ClientSource, RuntimeServices};
use prolif_nats::{JobQueue, NatsClient, SessionEventBus, TriggerScheduler};
use prolif_postgres::PgClient;
use prolif_trigger::ProviderRegistry;
use url::Url;

use crate::extract::ServiceAuthToken;
use crate::service::actions::ActionEngine;
use crate::service::fire::TriggerFireService;
use crate::service::gate::{GateConfig, SessionGate};
use crate::service::gateway::HttpSessionGateway;
use crate::service::inbox::InboxProcessor;
use crate::service::runs::RunLauncher;
use crate::service::sandbox::ModalSandboxProvider;
use crate::service::schedule::ScheduleSync;
use crate::service::sessions::SessionService;
use crate::service::snapshot::SnapshotBuilder;
use crate::service::wake_clients::CallbackWakeClient;
use crate::service::{RuntimeConfig, ServiceConfig};
use crate::{Error, Result};

/// The queue every runtime job travels on.
const RUNTIME_QUEUE: &str = "runtime";

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    nats_client: NatsClient,
    job_queue: JobQueue,
    scheduler: TriggerScheduler,
    event_bus: SessionEventBus,
    providers: ProviderRegistry,
    services: RuntimeServices,

    gate: SessionGate,
    session_service: SessionService,
    action_engine: ActionEngine,
    inbox_processor: InboxProcessor,
    fire_service: TriggerFireService,
    snapshot_builder: SnapshotBuilder,
    schedule_sync: ScheduleSync,

    service_auth: ServiceAuthToken,
    runtime_config: Arc<RuntimeConfig>,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to all external services and wires the service graph.
    pub async fn from_config(config: ServiceConfig) -> Result<Self> {
        let pg_client = config.postgres.clone().build()?;
        let nats_client = NatsClient::connect(config.nats.clone()).await?;

        let job_queue = JobQueue::new(nats_client.jetstream(), RUNTIME_QUEUE).await?;
        let scheduler = TriggerScheduler::new(job_queue.clone());
        let event_bus = SessionEventBus::new(nats_client.clone());
        let providers = ProviderRegistry::builtin();

        let services = Self::build_runtime_services(&config.runtime)?;

        Ok(Self::assemble(
            pg_client,
            nats_client,
            job_queue,
            scheduler,
            event_bus,
            providers,
            services,
            config.runtime,
        ))
    }

    /// Wires state from pre-built components (used by tests and the CLI).
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        pg_client: PgClient,
        nats_client: NatsClient,
        job_queue: JobQueue,
        scheduler: TriggerScheduler,
        event_bus: SessionEventBus,
        providers: ProviderRegistry,
        services: RuntimeServices,
        runtime_config: RuntimeConfig,
    ) -> Self {
        let gate = SessionGate::new(GateConfig {
            billing_enabled: runtime_config.billing_enabled,
            min_credits_to_start: runtime_config.min_credits_to_start,
        });

        let session_service = SessionService::new(gate.clone(), services.clone());
        let launcher = RunLauncher::new(session_service.clone());

        let action_engine = ActionEngine::new(services.clone());
        let inbox_processor = InboxProcessor::new(providers.clone(), launcher.clone());
        let fire_service = TriggerFireService::new(providers.clone(), launcher);
        let snapshot_builder =
            SnapshotBuilder::new(services.clone(), runtime_config.github_token.clone());
        let schedule_sync = ScheduleSync::new(scheduler.clone());

        let service_auth = ServiceAuthToken(runtime_config.service_auth_token.clone());

        Self {
            pg_client,
            nats_client,
            job_queue,
            scheduler,
            event_bus,
            providers,
            services,
            gate,
            session_service,
            action_engine,
            inbox_processor,
            fire_service,
            snapshot_builder,
            schedule_sync,
            service_auth,
            runtime_config: Arc::new(runtime_config),
        }
    }

    fn build_runtime_services(runtime: &RuntimeConfig) -> Result<RuntimeServices> {
        let gateway_url = Url::parse(&runtime.gateway_url)
            .map_err(|e| Error::config(format!("invalid gateway URL: {e}")))?;
        let sandbox_url = Url::parse(&runtime.sandbox_api_url)
            .map_err(|e| Error::config(format!("invalid sandbox API URL: {e}")))?;

        let gateway = Arc::new(HttpSessionGateway::new(
            gateway_url,
            runtime.service_auth_token.clone(),
        ));

        Ok(RuntimeServices::new(gateway)
            .with_sandbox(Arc::new(ModalSandboxProvider::new(sandbox_url)))
            .with_wake_client(Arc::new(CallbackWakeClient::new(ClientSource::Slack)))
            .with_wake_client(Arc::new(CallbackWakeClient::new(ClientSource::Cli))))
    }

    /// Returns the runtime configuration.
    pub fn runtime_config(&self) -> &RuntimeConfig {
        &self.runtime_config
    }

    /// Returns the database client.
    pub fn pg_client(&self) -> &PgClient {
        &self.pg_client
    }

    /// Returns the NATS client.
    pub fn nats_client(&self) -> &NatsClient {
        &self.nats_client
    }

    /// Returns the runtime job queue.
    pub fn job_queue(&self) -> &JobQueue {
        &self.job_queue
    }

    /// Returns the trigger scheduler.
    pub fn scheduler(&self) -> &TriggerScheduler {
        &self.scheduler
    }

    /// Returns the session event bus.
    pub fn event_bus(&self) -> &SessionEventBus {
        &self.event_bus
    }

    /// Returns the capability registries.
    pub fn services(&self) -> &RuntimeServices {
        &self.services
    }

    /// Returns the inbox processor.
    pub fn inbox_processor(&self) -> &InboxProcessor {
        &self.inbox_processor
    }

    /// Returns the trigger fire service.
    pub fn fire_service(&self) -> &TriggerFireService {
        &self.fire_service
    }

    /// Returns the snapshot builder.
    pub fn snapshot_builder(&self) -> &SnapshotBuilder {
        &self.snapshot_builder
    }

    /// Returns the schedule sync service.
    pub fn schedule_sync(&self) -> &ScheduleSync {
        &self.schedule_sync
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(nats_client: NatsClient);
impl_di!(job_queue: JobQueue);
impl_di!(scheduler: TriggerScheduler);
impl_di!(event_bus: SessionEventBus);
impl_di!(providers: ProviderRegistry);
impl_di!(services: RuntimeServices);

impl_di!(gate: SessionGate);
impl_di!(session_service: SessionService);
impl_di!(action_engine: ActionEngine);
impl_di!(inbox_processor: InboxProcessor);
impl_di!(fire_service: TriggerFireService);
impl_di!(snapshot_builder: SnapshotBuilder);
impl_di!(schedule_sync: ScheduleSync);

impl_di!(service_auth: ServiceAuthToken);
impl_di!(runtime_config: Arc<RuntimeConfig>);
