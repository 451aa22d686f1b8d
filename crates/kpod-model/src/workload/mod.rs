mod container;
pub use container::ContainerSpec;

mod pod;
pub use pod::WorkloadPodSpec;
