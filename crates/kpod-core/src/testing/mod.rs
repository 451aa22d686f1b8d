//! In-memory test doubles for the runtime session and the schema converter.
//!
//! [`MemoryRuntime`] keeps pods in a list and answers the [`RuntimeClient`] contract
//! with the same error kinds a real runtime would. It records every call, can fail a
//! chosen call of a chosen method, and can delay (or withhold) the `running` state to
//! exercise health polling. It does not run anything.
mod converter;
pub use converter::PassthroughConverter;

use std::{
    collections::{HashMap, VecDeque},
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;

use kpod_model::{
    ContainerHandle, ContainerInspect, ContainerState, ContainerTemplate, PodHandle, PodInspect,
    PodSummary, PodTemplate,
};

use crate::runtime::{Connector, RuntimeClient, RuntimeError, method};

/// Runtime method, as recorded by [`MemoryRuntime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    CreatePod,
    CreateContainer,
    StartPod,
    InspectPod,
    RemovePod,
    GetPod,
    ListPods,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::CreatePod => method::CREATE_POD,
            Method::CreateContainer => method::CREATE_CONTAINER,
            Method::StartPod => method::START_POD,
            Method::InspectPod => method::INSPECT_POD,
            Method::RemovePod => method::REMOVE_POD,
            Method::GetPod => method::GET_POD,
            Method::ListPods => method::LIST_PODS,
        }
    }

    /// A generic call error for this method.
    pub fn error(&self, message: impl Into<String>) -> RuntimeError {
        RuntimeError::call(self.as_str(), "io.podman.ErrorOccurred", message)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded call: method plus its main argument (pod or container name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub target: String,
}

struct Failure {
    /// Calls of the method that still succeed before this failure fires.
    skip: usize,
    error: RuntimeError,
}

struct MemContainer {
    id: String,
    template: ContainerTemplate,
}

struct MemPod {
    id: String,
    template: PodTemplate,
    started: bool,
    probes_since_start: u32,
    containers: Vec<MemContainer>,
}

impl MemPod {
    fn matches(&self, pod: &str) -> bool {
        self.id == pod || self.template.name == pod
    }
}

#[derive(Default)]
struct State {
    pods: Vec<MemPod>,
    calls: Vec<RecordedCall>,
    failures: HashMap<Method, VecDeque<Failure>>,
    startup_probes: u32,
    refuse_connections: bool,
    seq: u64,
}

impl State {
    fn record(&mut self, method: Method, target: &str) -> Result<(), RuntimeError> {
        self.calls.push(RecordedCall {
            method,
            target: target.to_string(),
        });

        let Some(queue) = self.failures.get_mut(&method) else {
            return Ok(());
        };
        let Some(front) = queue.front_mut() else {
            return Ok(());
        };
        if front.skip > 0 {
            front.skip -= 1;
            return Ok(());
        }
        match queue.pop_front() {
            Some(f) => Err(f.error),
            None => Ok(()),
        }
    }

    /// 64 hex chars like a real runtime id; the leading 12 are unique per object.
    fn next_id(&mut self) -> String {
        self.seq += 1;
        format!(
            "{:012x}{:052x}",
            self.seq,
            self.seq.wrapping_mul(0x9e37_79b9_7f4a_7c15)
        )
    }

    fn pod(&self, pod: &str) -> Result<&MemPod, RuntimeError> {
        self.pods
            .iter()
            .find(|p| p.matches(pod))
            .ok_or_else(|| RuntimeError::NotFound(pod.to_string()))
    }

    fn pod_mut(&mut self, pod: &str) -> Result<&mut MemPod, RuntimeError> {
        self.pods
            .iter_mut()
            .find(|p| p.matches(pod))
            .ok_or_else(|| RuntimeError::NotFound(pod.to_string()))
    }
}

/// Shared in-memory runtime. Clones observe the same state.
#[derive(Clone, Default)]
pub struct MemoryRuntime {
    state: Arc<Mutex<State>>,
}

impl MemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fail the next call of `method` with `error`.
    pub fn fail_next(&self, method: Method, error: RuntimeError) -> &Self {
        self.fail_after(method, 0, error)
    }

    /// Let `skip` more calls of `method` succeed, then fail one with `error`.
    pub fn fail_after(&self, method: Method, skip: usize, error: RuntimeError) -> &Self {
        self.state()
            .failures
            .entry(method)
            .or_default()
            .push_back(Failure { skip, error });
        self
    }

    /// Report workload containers as `created` for the first `probes` inspections after
    /// a pod starts, `running` afterwards.
    pub fn set_startup_probes(&self, probes: u32) -> &Self {
        self.state().startup_probes = probes;
        self
    }

    /// Never report workload containers as running.
    pub fn never_ready(&self) -> &Self {
        self.set_startup_probes(u32::MAX)
    }

    /// Make [`Connector::connect`] fail with a connection error.
    pub fn refuse_connections(&self) -> &Self {
        self.state().refuse_connections = true;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, method: Method) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    pub fn methods(&self) -> Vec<Method> {
        self.state().calls.iter().map(|c| c.method).collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Pod names in creation order.
    pub fn pod_names(&self) -> Vec<String> {
        self.state()
            .pods
            .iter()
            .map(|p| p.template.name.clone())
            .collect()
    }

    /// Runtime names of the containers of `pod`, in creation order.
    pub fn container_names(&self, pod: &str) -> Option<Vec<String>> {
        let state = self.state();
        let pod = state.pod(pod).ok()?;
        Some(
            pod.containers
                .iter()
                .map(|c| c.template.name.clone())
                .collect(),
        )
    }

    pub fn is_started(&self, pod: &str) -> Option<bool> {
        self.state().pod(pod).ok().map(|p| p.started)
    }
}

fn app_state(pod: &MemPod, startup_probes: u32) -> ContainerState {
    if !pod.started {
        ContainerState::Created
    } else if pod.probes_since_start > startup_probes {
        ContainerState::Running
    } else {
        ContainerState::Created
    }
}

#[async_trait]
impl RuntimeClient for MemoryRuntime {
    async fn create_pod(&self, template: &PodTemplate) -> Result<PodHandle, RuntimeError> {
        let mut state = self.state();
        state.record(Method::CreatePod, &template.name)?;

        if state.pods.iter().any(|p| p.template.name == template.name) {
            return Err(Method::CreatePod.error(format!(
                "pod name {} is already in use",
                template.name
            )));
        }
        let id = state.next_id();
        state.pods.push(MemPod {
            id: id.clone(),
            template: template.clone(),
            started: false,
            probes_since_start: 0,
            containers: Vec::new(),
        });
        Ok(PodHandle::new(id))
    }

    async fn create_container(
        &self,
        template: &ContainerTemplate,
    ) -> Result<ContainerHandle, RuntimeError> {
        let mut state = self.state();
        state.record(Method::CreateContainer, &template.name)?;

        let taken = state
            .pods
            .iter()
            .flat_map(|p| p.containers.iter())
            .any(|c| c.template.name == template.name);
        if taken {
            return Err(Method::CreateContainer.error(format!(
                "container name {} is already in use",
                template.name
            )));
        }
        let id = state.next_id();
        let pod = state.pod_mut(template.pod.as_str())?;
        pod.containers.push(MemContainer {
            id: id.clone(),
            template: template.clone(),
        });
        Ok(ContainerHandle::new(id))
    }

    async fn start_pod(&self, pod: &str) -> Result<(), RuntimeError> {
        let mut state = self.state();
        state.record(Method::StartPod, pod)?;

        let pod = state.pod_mut(pod)?;
        pod.started = true;
        pod.probes_since_start = 0;
        Ok(())
    }

    async fn inspect_pod(&self, pod: &str) -> Result<PodInspect, RuntimeError> {
        let mut state = self.state();
        state.record(Method::InspectPod, pod)?;

        let startup_probes = state.startup_probes;
        let pod = state.pod_mut(pod)?;
        if pod.started {
            pod.probes_since_start = pod.probes_since_start.saturating_add(1);
        }
        let app = app_state(pod, startup_probes);

        let mut containers = Vec::with_capacity(pod.containers.len() + 1);
        if pod.template.infra {
            containers.push(ContainerInspect {
                id: format!("{}-infra", pod.id),
                name: format!("{}-infra", pod.template.name),
                image: "k8s.gcr.io/pause:3.1".into(),
                state: if pod.started {
                    ContainerState::Running
                } else {
                    ContainerState::Created
                },
                infra: true,
                ..Default::default()
            });
        }
        containers.extend(pod.containers.iter().map(|c| ContainerInspect {
            id: c.id.clone(),
            name: c.template.name.clone(),
            image: c.template.image.clone(),
            command: c.template.command.clone(),
            args: c.template.args.clone(),
            env: c.template.env.clone(),
            labels: c.template.labels.clone(),
            state: app,
            infra: false,
        }));

        Ok(PodInspect {
            id: pod.id.clone(),
            name: pod.template.name.clone(),
            labels: pod.template.labels.clone(),
            containers,
        })
    }

    async fn remove_pod(&self, pod: &str, force: bool) -> Result<(), RuntimeError> {
        let mut state = self.state();
        state.record(Method::RemovePod, pod)?;

        let idx = state
            .pods
            .iter()
            .position(|p| p.matches(pod))
            .ok_or_else(|| RuntimeError::NotFound(pod.to_string()))?;
        if state.pods[idx].started && !force {
            return Err(Method::RemovePod.error(format!("pod {pod} has running containers")));
        }
        state.pods.remove(idx);
        Ok(())
    }

    async fn get_pod(&self, pod: &str) -> Result<(), RuntimeError> {
        let mut state = self.state();
        state.record(Method::GetPod, pod)?;
        state.pod(pod).map(|_| ())
    }

    async fn list_pods(&self) -> Result<Vec<PodSummary>, RuntimeError> {
        let mut state = self.state();
        state.record(Method::ListPods, "")?;
        Ok(state
            .pods
            .iter()
            .map(|p| PodSummary {
                id: p.id.clone(),
                name: p.template.name.clone(),
                status: if p.started { "Running" } else { "Created" }.to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl Connector for MemoryRuntime {
    type Client = MemoryRuntime;

    async fn connect(&self, address: &str) -> Result<Self::Client, RuntimeError> {
        if self.state().refuse_connections {
            return Err(RuntimeError::Connection(format!(
                "dial {address}: connection refused"
            )));
        }
        Ok(self.clone())
    }
}
