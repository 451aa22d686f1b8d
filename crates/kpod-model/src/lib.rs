mod domain;
pub use domain::{EnvVar, Env, Labels};
pub use domain::{LABEL_CONTAINER_NAME, LABEL_MANAGED_BY, MANAGED_BY_VALUE, RESERVED_LABEL_PREFIX};

mod error;
pub use error::{ModelError, ModelResult};

mod workload;
pub use workload::{ContainerSpec, WorkloadPodSpec};

mod runtime;
pub use runtime::{
    ContainerHandle, ContainerInspect, ContainerState, ContainerTemplate, PodHandle, PodInspect,
    PodSummary, PodTemplate, RuntimeKey,
};
