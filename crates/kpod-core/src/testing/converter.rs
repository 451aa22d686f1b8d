use kpod_model::{
    ContainerSpec, ContainerTemplate, PodHandle, PodInspect, PodTemplate, RuntimeKey,
    WorkloadPodSpec,
};

use crate::schema::{ConversionError, SchemaConverter};

/// Minimal converter: the key is the pod name and container names are prefixed with the
/// pod handle so they stay unique across pods.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughConverter;

impl SchemaConverter for PassthroughConverter {
    fn build_key(&self, spec: &WorkloadPodSpec) -> RuntimeKey {
        RuntimeKey::new(spec.name.clone())
    }

    fn to_pod_template(
        &self,
        key: &RuntimeKey,
        spec: &WorkloadPodSpec,
    ) -> Result<PodTemplate, ConversionError> {
        Ok(PodTemplate {
            name: key.to_string(),
            labels: spec.labels.clone(),
            infra: true,
        })
    }

    fn to_container_template(
        &self,
        container: &ContainerSpec,
        pod: &PodHandle,
    ) -> Result<ContainerTemplate, ConversionError> {
        Ok(ContainerTemplate {
            pod: pod.clone(),
            name: format!("{pod}-{}", container.name),
            image: container.image.clone(),
            command: container.command.clone(),
            args: container.args.clone(),
            env: container.env.clone(),
            labels: Default::default(),
        })
    }

    fn to_workload_pod(&self, status: &PodInspect) -> Result<WorkloadPodSpec, ConversionError> {
        if status.name.is_empty() {
            return Err(ConversionError::MissingField("name".into()));
        }
        let prefix = format!("{}-", status.id);
        let containers = status
            .app_containers()
            .map(|c| ContainerSpec {
                name: c
                    .name
                    .strip_prefix(&prefix)
                    .unwrap_or(&c.name)
                    .to_string(),
                image: c.image.clone(),
                command: c.command.clone(),
                args: c.args.clone(),
                env: c.env.clone(),
            })
            .collect();

        Ok(WorkloadPodSpec {
            name: status.name.clone(),
            labels: status.labels.clone(),
            containers,
        })
    }
}
