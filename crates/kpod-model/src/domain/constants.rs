//! Well-known label keys written onto runtime objects.
//!
//! The runtime only knows pods and containers by their own names, so everything needed to
//! map a runtime object back to the workload that produced it travels as labels.

/// Prefix of every label kpod owns. User labels must not use it.
pub const RESERVED_LABEL_PREFIX: &str = "kpod.io/";

/// Label marking a pod as created through kpod.
pub const LABEL_MANAGED_BY: &str = "kpod.io/managed-by";

/// Value stored under [`LABEL_MANAGED_BY`].
pub const MANAGED_BY_VALUE: &str = "kpod";

/// Label carrying the workload-level container name.
///
/// Runtime container names are global, so they are prefixed with the first 12
/// characters of the pod handle. This label keeps the original name recoverable.
pub const LABEL_CONTAINER_NAME: &str = "kpod.io/container-name";
