//! Mapping between the workload schema and the runtime's native representation.
mod error;
pub use error::ConversionError;

use kpod_model::{
    ContainerSpec, ContainerTemplate, PodHandle, PodInspect, PodTemplate, RuntimeKey,
    WorkloadPodSpec,
};

/// Pure, bidirectional converter between [`WorkloadPodSpec`] and runtime payloads.
///
/// Implementations must not perform I/O.
pub trait SchemaConverter: Send + Sync {
    /// Derive the runtime key of a spec. Same spec content must give the same key on every call.
    fn build_key(&self, spec: &WorkloadPodSpec) -> RuntimeKey;

    /// Build the pod shell payload for `spec`, addressed by `key`.
    fn to_pod_template(
        &self,
        key: &RuntimeKey,
        spec: &WorkloadPodSpec,
    ) -> Result<PodTemplate, ConversionError>;

    /// Build one container payload bound to an already created pod.
    fn to_container_template(
        &self,
        container: &ContainerSpec,
        pod: &PodHandle,
    ) -> Result<ContainerTemplate, ConversionError>;

    /// Rebuild a workload spec from a status snapshot.
    fn to_workload_pod(&self, status: &PodInspect) -> Result<WorkloadPodSpec, ConversionError>;
}
