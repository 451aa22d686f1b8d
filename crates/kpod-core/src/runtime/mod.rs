//! Call/response contract of the container runtime's control endpoint.
//!
//! The transport (socket, framing, method dispatch) lives behind these traits;
//! the reconciler only sequences calls and interprets their results.
mod error;
pub use error::RuntimeError;

use async_trait::async_trait;

use kpod_model::{
    ContainerHandle, ContainerTemplate, PodHandle, PodInspect, PodSummary, PodTemplate,
};

/// Method names used in logs, metrics and [`RuntimeError::Call`].
pub mod method {
    pub const CREATE_POD: &str = "CreatePod";
    pub const CREATE_CONTAINER: &str = "CreateContainer";
    pub const START_POD: &str = "StartPod";
    pub const INSPECT_POD: &str = "InspectPod";
    pub const REMOVE_POD: &str = "RemovePod";
    pub const GET_POD: &str = "GetPod";
    pub const LIST_PODS: &str = "ListPods";
}

/// A live session to the runtime.
///
/// Pods are addressed by name or id; both are accepted wherever a `pod: &str` is taken.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Create an empty pod shell.
    async fn create_pod(&self, template: &PodTemplate) -> Result<PodHandle, RuntimeError>;

    /// Create a container inside the pod named by `template.pod`.
    async fn create_container(
        &self,
        template: &ContainerTemplate,
    ) -> Result<ContainerHandle, RuntimeError>;

    /// Start every container of the pod.
    async fn start_pod(&self, pod: &str) -> Result<(), RuntimeError>;

    /// Fetch a fresh status snapshot.
    async fn inspect_pod(&self, pod: &str) -> Result<PodInspect, RuntimeError>;

    /// Remove the pod and its containers. `force` stops running containers without grace.
    async fn remove_pod(&self, pod: &str, force: bool) -> Result<(), RuntimeError>;

    /// Existence probe. Fails with [`RuntimeError::NotFound`] when absent.
    async fn get_pod(&self, pod: &str) -> Result<(), RuntimeError>;

    /// All pods known to the runtime, in the order the runtime reports them.
    async fn list_pods(&self) -> Result<Vec<PodSummary>, RuntimeError>;
}

/// Opens a [`RuntimeClient`] session to a control endpoint address.
#[async_trait]
pub trait Connector: Send + Sync {
    type Client: RuntimeClient;

    async fn connect(&self, address: &str) -> Result<Self::Client, RuntimeError>;
}
