//! Metrics collection abstraction for reconciler operations.
//!
//! Backends (prometheus, log lines, etc) implement [`MetricsBackend`] and are injected
//! with [`crate::Reconciler::with_metrics`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, Operation, OperationOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
