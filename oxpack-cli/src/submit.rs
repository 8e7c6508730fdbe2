//! Build submission
//!
//! The flow behind `oxpack build`: validate the registry tier, resolve a
//! source location, validate the platform, render and encode the pack
//! task, then hand the run request to the build service and branch on the
//! caller's wait mode.
//!
//! Collaborators are trait seams so the flow can be exercised without a
//! live service. No retries happen at this layer; every failure surfaces
//! immediately.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use oxpack_client::RegistryClient;
use oxpack_core::domain::platform::{Os, Platform};
use oxpack_core::domain::registry::Registry;
use oxpack_core::domain::run::Run;
use oxpack_core::dto::credentials::{AuthMode, RunCredentials};
use oxpack_core::dto::run::{DEFAULT_RUN_TIMEOUT_SECS, ScheduleRunRequest};
use oxpack_core::task;

/// What the caller wants to happen once the run is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Return the queued run immediately
    Detach,
    /// Poll run status until it reaches a terminal state
    Poll,
    /// Stream build logs until the run finishes
    Stream { raw: bool },
}

/// Inputs for one build submission
#[derive(Debug, Clone)]
pub struct BuildSpec {
    pub registry: String,
    pub image: String,
    pub source: String,
    pub builder: String,
    pub resource_group: Option<String>,
    pub platform: Option<String>,
    pub auth_mode: Option<AuthMode>,
    pub timeout: Option<u64>,
}

/// Result of a build submission
#[derive(Debug)]
pub enum BuildOutcome {
    /// The run was accepted; the caller did not wait for it
    Queued(Run),
    /// The run reached a terminal state
    Finished(Run),
}

/// Errors from the submission flow
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The registry cannot execute server-side runs
    #[error("{0}")]
    Configuration(String),

    /// An input failed validation before submission
    #[error("{0}")]
    Validation(String),

    /// Opaque failure from a collaborator: registry lookup, source
    /// upload, scheduling, polling, or streaming
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Resolves a registry and its service tier
#[async_trait]
pub trait RegistryResolver: Send + Sync {
    async fn resolve_registry(
        &self,
        name: &str,
        resource_group: Option<&str>,
    ) -> anyhow::Result<Registry>;
}

/// Produces a source location the build service can fetch
///
/// Returns `Ok(None)` when no usable location can be determined.
#[async_trait]
pub trait SourceLocator: Send + Sync {
    async fn locate_source(
        &self,
        source: &str,
        registry: &Registry,
    ) -> anyhow::Result<Option<String>>;
}

/// Accepts a run request and returns the queued run
#[async_trait]
pub trait RunScheduler: Send + Sync {
    async fn schedule_run(
        &self,
        registry: &str,
        request: &ScheduleRunRequest,
    ) -> anyhow::Result<Run>;
}

/// Blocks until a run reaches a terminal state
#[async_trait]
pub trait RunWaiter: Send + Sync {
    async fn wait_for_run(&self, registry: &str, run_id: Uuid) -> anyhow::Result<Run>;
}

/// Streams run logs until the run reaches a terminal state
#[async_trait]
pub trait LogFollower: Send + Sync {
    async fn follow_run(&self, registry: &str, run_id: Uuid, raw: bool) -> anyhow::Result<Run>;
}

#[async_trait]
impl RegistryResolver for RegistryClient {
    async fn resolve_registry(
        &self,
        name: &str,
        resource_group: Option<&str>,
    ) -> anyhow::Result<Registry> {
        Ok(self.get_registry(name, resource_group).await?)
    }
}

#[async_trait]
impl RunScheduler for RegistryClient {
    async fn schedule_run(
        &self,
        registry: &str,
        request: &ScheduleRunRequest,
    ) -> anyhow::Result<Run> {
        Ok(RegistryClient::schedule_run(self, registry, request).await?)
    }
}

/// Submit a buildpack build and branch on the caller's wait mode
///
/// Blocks until the service accepts the run (not until the build
/// completes), then returns, polls, or streams per `wait`. The queued run
/// id is logged regardless of the wait mode.
pub async fn submit_build(
    registries: &dyn RegistryResolver,
    sources: &dyn SourceLocator,
    scheduler: &dyn RunScheduler,
    waiter: &dyn RunWaiter,
    follower: &dyn LogFollower,
    spec: BuildSpec,
    wait: WaitMode,
) -> Result<BuildOutcome, SubmitError> {
    let registry = registries
        .resolve_registry(&spec.registry, spec.resource_group.as_deref())
        .await?;
    if !registry.tier.supports_task_runs() {
        return Err(SubmitError::Configuration(format!(
            "buildpack builds are only available for managed registries; '{}' is {} tier",
            registry.name, registry.tier
        )));
    }

    let source_location = sources
        .locate_source(&spec.source, &registry)
        .await?
        .ok_or_else(|| {
            SubmitError::Validation(
                "building with buildpacks requires a usable source location".to_string(),
            )
        })?;

    let platform = Platform::parse(spec.platform.as_deref())
        .map_err(|e| SubmitError::Validation(e.to_string()))?;
    if platform.os != Os::Linux {
        return Err(SubmitError::Validation(
            "building with buildpacks is only supported on linux".to_string(),
        ));
    }

    let task_body = task::render_pack_task(&spec.image, &spec.builder);
    let request = ScheduleRunRequest {
        encoded_task: task::encode_task(&task_body),
        source_location,
        timeout: spec.timeout.or(Some(DEFAULT_RUN_TIMEOUT_SECS)),
        platform,
        credentials: spec.auth_mode.map(RunCredentials::for_auth_mode),
    };

    let run = scheduler.schedule_run(&registry.name, &request).await?;

    info!("Queued run {} on registry {}", run.id, registry.name);

    match wait {
        WaitMode::Detach => Ok(BuildOutcome::Queued(run)),
        WaitMode::Poll => {
            let finished = waiter.wait_for_run(&registry.name, run.id).await?;
            Ok(BuildOutcome::Finished(finished))
        }
        WaitMode::Stream { raw } => {
            let finished = follower.follow_run(&registry.name, run.id, raw).await?;
            Ok(BuildOutcome::Finished(finished))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxpack_core::domain::registry::RegistryTier;
    use oxpack_core::domain::run::RunStatus;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn sample_registry(tier: RegistryTier) -> Registry {
        Registry {
            name: "forge".to_string(),
            resource_group: "default".to_string(),
            login_server: "forge.example.com".to_string(),
            tier,
        }
    }

    fn sample_run(status: RunStatus) -> Run {
        Run {
            id: Uuid::new_v4(),
            registry: "forge".to_string(),
            status,
            image: Some("app:v1".to_string()),
            created_at: chrono::Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    fn sample_spec() -> BuildSpec {
        BuildSpec {
            registry: "forge".to_string(),
            image: "app:v1".to_string(),
            source: ".".to_string(),
            builder: "example/builder:tag".to_string(),
            resource_group: None,
            platform: None,
            auth_mode: None,
            timeout: None,
        }
    }

    struct StaticRegistry(Registry);

    #[async_trait]
    impl RegistryResolver for StaticRegistry {
        async fn resolve_registry(
            &self,
            _name: &str,
            _resource_group: Option<&str>,
        ) -> anyhow::Result<Registry> {
            Ok(self.0.clone())
        }
    }

    struct StaticSource(Option<String>);

    #[async_trait]
    impl SourceLocator for StaticSource {
        async fn locate_source(
            &self,
            _source: &str,
            _registry: &Registry,
        ) -> anyhow::Result<Option<String>> {
            Ok(self.0.clone())
        }
    }

    struct RecordingScheduler {
        run: Run,
        requests: Mutex<Vec<ScheduleRunRequest>>,
    }

    impl RecordingScheduler {
        fn new(run: Run) -> Self {
            Self {
                run,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ScheduleRunRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RunScheduler for RecordingScheduler {
        async fn schedule_run(
            &self,
            _registry: &str,
            request: &ScheduleRunRequest,
        ) -> anyhow::Result<Run> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.run.clone())
        }
    }

    struct StubWaiter {
        run: Run,
        called: AtomicBool,
    }

    impl StubWaiter {
        fn new(run: Run) -> Self {
            Self {
                run,
                called: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl RunWaiter for StubWaiter {
        async fn wait_for_run(&self, _registry: &str, _run_id: Uuid) -> anyhow::Result<Run> {
            self.called.store(true, Ordering::SeqCst);
            Ok(self.run.clone())
        }
    }

    struct StubFollower {
        run: Run,
        last_raw: Mutex<Option<bool>>,
    }

    impl StubFollower {
        fn new(run: Run) -> Self {
            Self {
                run,
                last_raw: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LogFollower for StubFollower {
        async fn follow_run(
            &self,
            _registry: &str,
            _run_id: Uuid,
            raw: bool,
        ) -> anyhow::Result<Run> {
            *self.last_raw.lock().unwrap() = Some(raw);
            Ok(self.run.clone())
        }
    }

    struct Harness {
        registries: StaticRegistry,
        sources: StaticSource,
        scheduler: RecordingScheduler,
        waiter: StubWaiter,
        follower: StubFollower,
    }

    impl Harness {
        fn managed() -> Self {
            Self {
                registries: StaticRegistry(sample_registry(RegistryTier::Managed)),
                sources: StaticSource(Some("uploads/src.tar.gz".to_string())),
                scheduler: RecordingScheduler::new(sample_run(RunStatus::Queued)),
                waiter: StubWaiter::new(sample_run(RunStatus::Succeeded)),
                follower: StubFollower::new(sample_run(RunStatus::Succeeded)),
            }
        }

        async fn submit(
            &self,
            spec: BuildSpec,
            wait: WaitMode,
        ) -> Result<BuildOutcome, SubmitError> {
            submit_build(
                &self.registries,
                &self.sources,
                &self.scheduler,
                &self.waiter,
                &self.follower,
                spec,
                wait,
            )
            .await
        }
    }

    #[tokio::test]
    async fn test_non_managed_registry_fails_before_any_remote_call() {
        let mut harness = Harness::managed();
        harness.registries = StaticRegistry(sample_registry(RegistryTier::Standard));

        let result = harness.submit(sample_spec(), WaitMode::Detach).await;

        assert!(matches!(result, Err(SubmitError::Configuration(_))));
        assert!(harness.scheduler.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_source_fails_before_platform_resolution() {
        let mut harness = Harness::managed();
        harness.sources = StaticSource(None);

        // An invalid platform string would also fail; the source failure
        // must win because it is checked first.
        let spec = BuildSpec {
            platform: Some("mars/quantum".to_string()),
            ..sample_spec()
        };
        let result = harness.submit(spec, WaitMode::Detach).await;

        match result {
            Err(SubmitError::Validation(message)) => {
                assert!(message.contains("source location"), "got: {}", message);
            }
            other => panic!("expected source validation error, got {:?}", other),
        }
        assert!(harness.scheduler.requests().is_empty());
    }

    #[tokio::test]
    async fn test_non_linux_platform_is_rejected_without_a_request() {
        let harness = Harness::managed();

        let spec = BuildSpec {
            platform: Some("windows/amd64".to_string()),
            ..sample_spec()
        };
        let result = harness.submit(spec, WaitMode::Detach).await;

        match result {
            Err(SubmitError::Validation(message)) => {
                assert!(message.contains("linux"), "got: {}", message);
            }
            other => panic!("expected platform validation error, got {:?}", other),
        }
        assert!(harness.scheduler.requests().is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_the_rendered_task_and_inputs() {
        let harness = Harness::managed();

        let spec = BuildSpec {
            auth_mode: Some(AuthMode::Default),
            timeout: Some(900),
            ..sample_spec()
        };
        harness.submit(spec, WaitMode::Detach).await.unwrap();

        let requests = harness.scheduler.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];

        let decoded = task::decode_task(&request.encoded_task).unwrap();
        assert_eq!(
            decoded,
            task::render_pack_task("app:v1", "example/builder:tag")
        );
        assert_eq!(request.source_location, "uploads/src.tar.gz");
        assert_eq!(request.timeout, Some(900));
        assert_eq!(request.platform, Platform::default());
        let credentials = request.credentials.as_ref().unwrap();
        assert_eq!(credentials.source_registry.login_mode, AuthMode::Default);
    }

    #[tokio::test]
    async fn test_unset_timeout_falls_back_to_the_service_default() {
        let harness = Harness::managed();

        harness.submit(sample_spec(), WaitMode::Detach).await.unwrap();

        let requests = harness.scheduler.requests();
        assert_eq!(requests[0].timeout, Some(DEFAULT_RUN_TIMEOUT_SECS));
        assert!(requests[0].credentials.is_none());
    }

    #[tokio::test]
    async fn test_detach_returns_the_queued_run_untouched() {
        let harness = Harness::managed();

        let outcome = harness.submit(sample_spec(), WaitMode::Detach).await.unwrap();

        match outcome {
            BuildOutcome::Queued(run) => assert_eq!(run.id, harness.scheduler.run.id),
            other => panic!("expected queued outcome, got {:?}", other),
        }
        assert!(!harness.waiter.called.load(Ordering::SeqCst));
        assert!(harness.follower.last_raw.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_poll_mode_returns_the_waiter_result() {
        let harness = Harness::managed();

        let outcome = harness.submit(sample_spec(), WaitMode::Poll).await.unwrap();

        match outcome {
            BuildOutcome::Finished(run) => assert_eq!(run.id, harness.waiter.run.id),
            other => panic!("expected finished outcome, got {:?}", other),
        }
        assert!(harness.waiter.called.load(Ordering::SeqCst));
        assert!(harness.follower.last_raw.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stream_mode_returns_the_follower_result_and_passes_raw() {
        let harness = Harness::managed();

        let outcome = harness
            .submit(sample_spec(), WaitMode::Stream { raw: true })
            .await
            .unwrap();

        match outcome {
            BuildOutcome::Finished(run) => assert_eq!(run.id, harness.follower.run.id),
            other => panic!("expected finished outcome, got {:?}", other),
        }
        assert_eq!(*harness.follower.last_raw.lock().unwrap(), Some(true));
        assert!(!harness.waiter.called.load(Ordering::SeqCst));
    }
}
