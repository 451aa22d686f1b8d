//! Runtime-native representations exchanged with the container runtime.
mod handle;
pub use handle::{ContainerHandle, PodHandle, RuntimeKey};

mod template;
pub use template::{ContainerTemplate, PodTemplate};

mod inspect;
pub use inspect::{ContainerInspect, ContainerState, PodInspect, PodSummary};
