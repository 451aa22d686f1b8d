//! Pod lifecycle reconciler.
//!
//! Turns "this pod with these containers should exist" into ordered runtime calls:
//! - owns the runtime session behind a single lock (operations are serialized);
//! - derives the runtime key from the spec on every call through the [`SchemaConverter`];
//! - sequences create/start/health-check and delete/recreate;
//! - maps every failure into one [`ReconcileError`].
mod cancel;
mod health;
mod stage;

pub use cancel::deadline_token;
pub use stage::CreateStage;

use std::{future::Future, time::Instant};

use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use kpod_model::{PodHandle, RuntimeKey, WorkloadPodSpec};

use crate::{
    config::ReconcilerConfig,
    error::ReconcileError,
    metrics::{MetricsHandle, Operation, OperationOutcome, noop_metrics},
    runtime::{Connector, RuntimeClient, RuntimeError, method},
    schema::SchemaConverter,
};
use cancel::{guarded, pause};
use health::{PollOutcome, poll_until};

/// Converges the runtime towards declared workload pods.
///
/// The reconciler keeps no pod state of its own: everything is read back from the
/// runtime on demand. Its only resource is the runtime session, which it owns for its
/// whole lifetime.
///
/// # Concurrency
/// Every public operation holds the session lock from start to finish, so operations
/// issued concurrently on one reconciler run one after another. The transport is never
/// asked to multiplex calls.
///
/// # Cancellation
/// Each operation takes a [`CancellationToken`]. It is observed while waiting for the lock,
/// around every runtime call, every settle delay and every health probe; a cancelled
/// operation returns [`ReconcileError::Cancelled`]. Runtime state created before that
/// point is left in place.
pub struct Reconciler<C, V> {
    conn: Mutex<C>,
    converter: V,
    config: ReconcilerConfig,
    metrics: MetricsHandle,
}

impl<C, V> Reconciler<C, V>
where
    C: RuntimeClient,
    V: SchemaConverter,
{
    /// Create a reconciler over an already open session.
    pub fn new(client: C, converter: V, config: ReconcilerConfig) -> Result<Self, ReconcileError> {
        config.validate()?;
        Ok(Self {
            conn: Mutex::new(client),
            converter,
            config,
            metrics: noop_metrics(),
        })
    }

    /// Open a session to `config.socket` with `connector` and create a reconciler over it.
    #[instrument(level = "debug", skip_all, fields(socket = %config.socket))]
    pub async fn connect<K>(
        connector: &K,
        converter: V,
        config: ReconcilerConfig,
    ) -> Result<Self, ReconcileError>
    where
        K: Connector<Client = C>,
    {
        config.validate()?;
        let client = connector.connect(&config.socket).await.map_err(|e| match e {
            RuntimeError::Connection(msg) => ReconcileError::Connection(msg),
            other => ReconcileError::Connection(other.to_string()),
        })?;
        info!("connected to runtime");
        Self::new(client, converter, config)
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Create the pod and its containers, start it and wait until it is healthy.
    ///
    /// Steps:
    /// 1. Validate the spec; an invalid spec fails before the session is locked.
    /// 2. `CreatePod` with the converted pod template.
    /// 3. `CreateContainer` for each container, in spec order.
    /// 4. `StartPod`.
    /// 5. Poll `InspectPod` until every container is running, at most
    ///    `health.attempts` times.
    ///
    /// There is no rollback. If a step fails, whatever the earlier steps created stays
    /// in the runtime (see [`CreateStage`]); call [`Reconciler::delete`] to clean up.
    #[instrument(level = "debug", skip(self, spec, cancel), fields(pod = %spec.name))]
    pub async fn create(
        &self,
        spec: &WorkloadPodSpec,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        self.observe(Operation::Create, async {
            spec.validate()?;
            let client = self.lock(cancel).await?;
            self.create_locked(&*client, spec, cancel).await
        })
        .await
    }

    /// Create the pod if it does not exist, otherwise replace it.
    ///
    /// Existence is probed with [`Reconciler::get`]. An existing pod is always recreated
    /// through [`Reconciler::update`], even if nothing changed. A probe failure other than
    /// "not found" is returned as is.
    #[instrument(level = "debug", skip(self, spec, cancel), fields(pod = %spec.name))]
    pub async fn create_or_update(
        &self,
        spec: &WorkloadPodSpec,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        self.observe(Operation::CreateOrUpdate, async {
            spec.validate()?;
            let client = self.lock(cancel).await?;
            let key = self.key_for(spec)?;

            match self.get_by_key_locked(&*client, key.as_str(), cancel).await {
                Ok(_) => {
                    debug!(pod = %key, "pod exists, updating");
                    self.update_locked(&*client, spec, cancel).await
                }
                Err(ReconcileError::NotFound(_)) => {
                    debug!(pod = %key, "pod not found, creating");
                    self.create_locked(&*client, spec, cancel).await
                }
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Replace the pod: delete it, then create it from `spec`.
    ///
    /// Not atomic. If the delete succeeds and the create fails, the pod is gone from the
    /// runtime (or partially recreated, see [`Reconciler::create`]). Callers that need the
    /// workload back must retry or recreate it themselves.
    #[instrument(level = "debug", skip(self, spec, cancel), fields(pod = %spec.name))]
    pub async fn update(
        &self,
        spec: &WorkloadPodSpec,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        self.observe(Operation::Update, async {
            spec.validate()?;
            let client = self.lock(cancel).await?;
            self.update_locked(&*client, spec, cancel).await
        })
        .await
    }

    /// Force-remove the pod and all its containers.
    ///
    /// Fails with [`ReconcileError::NotFound`] if the runtime has no such pod.
    /// On success waits for the settle delay before returning.
    #[instrument(level = "debug", skip(self, spec, cancel), fields(pod = %spec.name))]
    pub async fn delete(
        &self,
        spec: &WorkloadPodSpec,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        self.observe(Operation::Delete, async {
            let client = self.lock(cancel).await?;
            self.delete_locked(&*client, spec, cancel).await
        })
        .await
    }

    /// Read the pod addressed by `spec` back from the runtime.
    #[instrument(level = "debug", skip(self, spec, cancel), fields(pod = %spec.name))]
    pub async fn get(
        &self,
        spec: &WorkloadPodSpec,
        cancel: &CancellationToken,
    ) -> Result<WorkloadPodSpec, ReconcileError> {
        self.observe(Operation::Get, async {
            let client = self.lock(cancel).await?;
            let key = self.key_for(spec)?;
            self.get_by_key_locked(&*client, key.as_str(), cancel).await
        })
        .await
    }

    /// Read a pod back from the runtime by its runtime key.
    #[instrument(level = "debug", skip(self, cancel))]
    pub async fn get_by_name(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkloadPodSpec, ReconcileError> {
        self.observe(Operation::GetByName, async {
            if key.trim().is_empty() {
                return Err(ReconcileError::Validation("pod key is empty".into()));
            }
            let client = self.lock(cancel).await?;
            self.get_by_key_locked(&*client, key, cancel).await
        })
        .await
    }

    /// Read back every pod the runtime reports, in runtime order.
    ///
    /// All or nothing: if any single pod cannot be read or converted, the whole list
    /// fails with that error and no partial result is returned.
    #[instrument(level = "debug", skip(self, cancel))]
    pub async fn list(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<WorkloadPodSpec>, ReconcileError> {
        self.observe(Operation::List, async {
            let client = self.lock(cancel).await?;
            self.list_locked(&*client, cancel).await
        })
        .await
    }

    async fn list_locked(
        &self,
        client: &C,
        cancel: &CancellationToken,
    ) -> Result<Vec<WorkloadPodSpec>, ReconcileError> {
        let summaries = self
            .call(cancel, method::LIST_PODS, client.list_pods())
            .await?;
        debug!(count = summaries.len(), "listed pods");

        let mut pods = Vec::with_capacity(summaries.len());
        for summary in &summaries {
            pods.push(
                self.get_by_key_locked(client, &summary.name, cancel)
                    .await?,
            );
        }
        Ok(pods)
    }

    async fn create_locked(
        &self,
        client: &C,
        spec: &WorkloadPodSpec,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        let key = self.key_for(spec)?;

        let mut stage = CreateStage::Validated;
        let res = self.create_steps(client, spec, &key, &mut stage, cancel).await;
        match &res {
            Ok(()) => info!(pod = %key, containers = spec.containers.len(), "pod created and healthy"),
            Err(e) if stage.left_runtime_state() => warn!(
                pod = %key,
                stage = %stage,
                error = %e,
                "create aborted, partial pod left in runtime"
            ),
            Err(e) => debug!(pod = %key, error = %e, "create failed before any runtime change"),
        }
        res
    }

    async fn create_steps(
        &self,
        client: &C,
        spec: &WorkloadPodSpec,
        key: &RuntimeKey,
        stage: &mut CreateStage,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        let template = self.converter.to_pod_template(key, spec)?;
        let pod = self
            .call(cancel, method::CREATE_POD, client.create_pod(&template))
            .await?;
        *stage = CreateStage::PodCreated { containers: 0 };
        debug!(pod = %key, handle = %pod, "pod shell created");
        self.settle(cancel).await?;

        for (i, container) in spec.containers.iter().enumerate() {
            let template = self.converter.to_container_template(container, &pod)?;
            let id = self
                .call(
                    cancel,
                    method::CREATE_CONTAINER,
                    client.create_container(&template),
                )
                .await?;
            *stage = CreateStage::PodCreated { containers: i + 1 };
            debug!(pod = %key, container = %container.name, id = %id, "container created");
        }
        *stage = CreateStage::ContainersCreated;
        self.settle(cancel).await?;

        self.call(cancel, method::START_POD, client.start_pod(pod.as_str()))
            .await?;
        *stage = CreateStage::Started;
        debug!(pod = %key, "pod started");
        self.settle(cancel).await?;

        self.wait_healthy(client, key, &pod, cancel).await?;
        *stage = CreateStage::Healthy;
        Ok(())
    }

    /// Poll the freshly started pod until all workload containers run.
    async fn wait_healthy(
        &self,
        client: &C,
        key: &RuntimeKey,
        pod: &PodHandle,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        let health = &self.config.health;
        let outcome = poll_until(health.attempts, health.delay(), cancel, move |attempt| async move {
            let status = self
                .call(cancel, method::INSPECT_POD, client.inspect_pod(pod.as_str()))
                .await?;
            let healthy = status.all_running();
            self.metrics.record_health_probe(healthy);
            trace!(
                pod = %key,
                attempt,
                healthy,
                states = ?status.app_containers().map(|c| c.state.as_str()).collect::<Vec<_>>(),
                "health probe"
            );
            Ok(healthy)
        })
        .await?;

        match outcome {
            PollOutcome::Ready { attempt } => {
                debug!(pod = %key, attempt, "pod healthy");
                Ok(())
            }
            PollOutcome::Exhausted => Err(ReconcileError::Timeout {
                pod: key.to_string(),
                attempts: health.attempts,
            }),
        }
    }

    async fn update_locked(
        &self,
        client: &C,
        spec: &WorkloadPodSpec,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        self.delete_locked(client, spec, cancel).await?;
        self.create_locked(client, spec, cancel).await
    }

    async fn delete_locked(
        &self,
        client: &C,
        spec: &WorkloadPodSpec,
        cancel: &CancellationToken,
    ) -> Result<(), ReconcileError> {
        let key = self.key_for(spec)?;
        self.call(
            cancel,
            method::REMOVE_POD,
            client.remove_pod(key.as_str(), true),
        )
        .await?;
        info!(pod = %key, "pod removed");
        self.settle(cancel).await
    }

    async fn get_by_key_locked(
        &self,
        client: &C,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkloadPodSpec, ReconcileError> {
        self.call(cancel, method::GET_POD, client.get_pod(key))
            .await?;
        let status = self
            .call(cancel, method::INSPECT_POD, client.inspect_pod(key))
            .await?;
        let pod = self.converter.to_workload_pod(&status)?;
        trace!(pod = %key, containers = pod.containers.len(), "pod read back");
        Ok(pod)
    }

    /// Derive the runtime key. Only the name is required to be usable here;
    /// full validation is left to the create path.
    fn key_for(&self, spec: &WorkloadPodSpec) -> Result<RuntimeKey, ReconcileError> {
        if spec.name.trim().is_empty() {
            return Err(ReconcileError::Validation("pod name is empty".into()));
        }
        Ok(self.converter.build_key(spec))
    }

    async fn lock(&self, cancel: &CancellationToken) -> Result<MutexGuard<'_, C>, ReconcileError> {
        guarded(cancel, self.conn.lock()).await
    }

    async fn settle(&self, cancel: &CancellationToken) -> Result<(), ReconcileError> {
        pause(cancel, self.config.settle_delay()).await
    }

    /// Issue one runtime call under cancellation and map its error.
    async fn call<T, F>(
        &self,
        cancel: &CancellationToken,
        method: &'static str,
        fut: F,
    ) -> Result<T, ReconcileError>
    where
        F: Future<Output = Result<T, RuntimeError>>,
    {
        trace!(method, "runtime call");
        guarded(cancel, fut).await?.map_err(|e| {
            self.metrics.record_runtime_error(method, e.kind());
            debug!(method, error = %e, "runtime call failed");
            ReconcileError::from(e)
        })
    }

    /// Wrap a public operation with start/completion metrics.
    async fn observe<T, F>(&self, op: Operation, fut: F) -> Result<T, ReconcileError>
    where
        F: Future<Output = Result<T, ReconcileError>>,
    {
        self.metrics.record_operation_started(op);
        let started = Instant::now();
        let res = fut.await;
        self.metrics.record_operation_completed(
            op,
            OperationOutcome::of(&res),
            started.elapsed().as_millis() as u64,
        );
        res
    }
}
