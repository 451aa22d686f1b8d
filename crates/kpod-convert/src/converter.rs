use kpod_core::{ConversionError, SchemaConverter};
use kpod_model::{
    ContainerSpec, ContainerTemplate, LABEL_CONTAINER_NAME, LABEL_MANAGED_BY, Labels,
    MANAGED_BY_VALUE, PodHandle, PodInspect, PodTemplate, RESERVED_LABEL_PREFIX, RuntimeKey,
    WorkloadPodSpec,
};

use crate::{
    naming::{container_runtime_name, validate_key},
    status::workload_pod,
};

/// Converter addressing pods by their name.
///
/// Pods get the `kpod.io/managed-by=kpod` label, containers get `kpod.io/container-name`
/// with the workload container name, and container runtime names are scoped with the pod
/// handle (see [`container_runtime_name`]). User labels under `kpod.io/` are rejected.
#[derive(Debug, Clone)]
pub struct DefaultConverter {
    infra: bool,
}

impl DefaultConverter {
    pub fn new() -> Self {
        Self { infra: true }
    }

    /// Ask the runtime not to create an infra container for new pods.
    pub fn without_infra(mut self) -> Self {
        self.infra = false;
        self
    }
}

impl Default for DefaultConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaConverter for DefaultConverter {
    fn build_key(&self, spec: &WorkloadPodSpec) -> RuntimeKey {
        RuntimeKey::new(spec.name.clone())
    }

    fn to_pod_template(
        &self,
        key: &RuntimeKey,
        spec: &WorkloadPodSpec,
    ) -> Result<PodTemplate, ConversionError> {
        validate_key(key.as_str())?;
        if let Some(reserved) = spec.labels.reserved_key() {
            return Err(ConversionError::Invalid(format!(
                "label {reserved} uses the reserved {RESERVED_LABEL_PREFIX} prefix"
            )));
        }

        let mut labels = spec.labels.clone();
        labels.insert(LABEL_MANAGED_BY, MANAGED_BY_VALUE);

        Ok(PodTemplate {
            name: key.to_string(),
            labels,
            infra: self.infra,
        })
    }

    fn to_container_template(
        &self,
        container: &ContainerSpec,
        pod: &PodHandle,
    ) -> Result<ContainerTemplate, ConversionError> {
        if container.name.is_empty() {
            return Err(ConversionError::MissingField("container name".into()));
        }
        if container.image.is_empty() {
            return Err(ConversionError::MissingField(format!(
                "image of container {}",
                container.name
            )));
        }

        let mut labels = Labels::new();
        labels
            .insert(LABEL_MANAGED_BY, MANAGED_BY_VALUE)
            .insert(LABEL_CONTAINER_NAME, container.name.as_str());

        Ok(ContainerTemplate {
            pod: pod.clone(),
            name: container_runtime_name(pod, &container.name),
            image: container.image.clone(),
            command: container.command.clone(),
            args: container.args.clone(),
            env: container.env.clone(),
            labels,
        })
    }

    fn to_workload_pod(&self, status: &PodInspect) -> Result<WorkloadPodSpec, ConversionError> {
        workload_pod(status)
    }
}
