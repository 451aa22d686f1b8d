use tracing::trace;

use kpod_core::ConversionError;
use kpod_model::{ContainerInspect, ContainerSpec, LABEL_CONTAINER_NAME, PodInspect, WorkloadPodSpec};

use crate::naming::short_id;

/// Rebuild a workload spec from an inspect snapshot.
///
/// Infra containers are skipped and `kpod.io/` labels are dropped.
pub(crate) fn workload_pod(status: &PodInspect) -> Result<WorkloadPodSpec, ConversionError> {
    if status.name.trim().is_empty() {
        return Err(ConversionError::MissingField(format!(
            "name of pod {}",
            status.id
        )));
    }

    let prefix = format!("{}-", short_id(&status.id));
    let containers = status
        .app_containers()
        .map(|c| workload_container(c, &prefix))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WorkloadPodSpec {
        name: status.name.clone(),
        labels: status.labels.without_reserved(),
        containers,
    })
}

fn workload_container(
    c: &ContainerInspect,
    prefix: &str,
) -> Result<ContainerSpec, ConversionError> {
    if c.image.trim().is_empty() {
        return Err(ConversionError::MissingField(format!(
            "image of container {}",
            c.id
        )));
    }

    let name = match c.labels.get(LABEL_CONTAINER_NAME) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            trace!(container = %c.name, "no container-name label, deriving from runtime name");
            c.name.strip_prefix(prefix).unwrap_or(&c.name).to_string()
        }
    };
    if name.is_empty() {
        return Err(ConversionError::MissingField(format!(
            "name of container {}",
            c.id
        )));
    }

    Ok(ContainerSpec {
        name,
        image: c.image.clone(),
        command: c.command.clone(),
        args: c.args.clone(),
        env: c.env.clone(),
    })
}
