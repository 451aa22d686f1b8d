use crate::metrics::backend::{MetricsBackend, Operation, OperationOutcome};

/// No-op metrics backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_operation_started(&self, _: Operation) {}

    #[inline(always)]
    fn record_operation_completed(&self, _: Operation, _: OperationOutcome, _: u64) {}

    #[inline(always)]
    fn record_runtime_error(&self, _: &str, _: &str) {}

    #[inline(always)]
    fn record_health_probe(&self, _: bool) {}
}
