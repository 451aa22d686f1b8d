//! Reconciler events as log lines.
//!
//! [`TracingMetrics`] is a [`MetricsBackend`] that writes every operation event to the
//! `kpod::events` target instead of counting it. Useful when no metrics stack is deployed
//! but operators still want a line per reconciler operation.
use kpod_core::{MetricsBackend, Operation, OperationOutcome};
use tracing::{debug, info, trace, warn};

const TARGET: &str = "kpod::events";

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetrics;

impl TracingMetrics {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsBackend for TracingMetrics {
    fn record_operation_started(&self, op: Operation) {
        trace!(target: TARGET, operation = op.as_label(), "operation started");
    }

    fn record_operation_completed(&self, op: Operation, outcome: OperationOutcome, duration_ms: u64) {
        let operation = op.as_label();
        let result = outcome.as_label();
        match outcome {
            OperationOutcome::Success => {
                info!(target: TARGET, operation, outcome = result, duration_ms, "operation completed")
            }
            // absence is an answer, not a fault
            OperationOutcome::NotFound | OperationOutcome::Cancelled => {
                debug!(target: TARGET, operation, outcome = result, duration_ms, "operation completed")
            }
            OperationOutcome::Failure | OperationOutcome::Timeout => {
                warn!(target: TARGET, operation, outcome = result, duration_ms, "operation failed")
            }
        }
    }

    fn record_runtime_error(&self, method: &str, error_kind: &str) {
        debug!(target: TARGET, method, error_kind, "runtime call failed");
    }

    fn record_health_probe(&self, healthy: bool) {
        trace!(target: TARGET, healthy, "health probe");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tracing::Level;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn capture(level: Level, f: impl FnOnce(&TracingMetrics)) -> String {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(level)
            .finish();
        tracing::subscriber::with_default(subscriber, || f(&TracingMetrics::new()));
        out.text()
    }

    #[test]
    fn failures_are_warnings() {
        let logs = capture(Level::WARN, |m| {
            m.record_operation_completed(Operation::Create, OperationOutcome::Success, 12);
            m.record_operation_completed(Operation::Create, OperationOutcome::Timeout, 420);
        });

        assert!(logs.contains("operation failed"), "{logs}");
        assert!(logs.contains("outcome=\"timeout\"") || logs.contains("outcome=timeout"), "{logs}");
        assert!(!logs.contains("operation completed"), "{logs}");
    }

    #[test]
    fn success_is_info_with_duration() {
        let logs = capture(Level::INFO, |m| {
            m.record_operation_started(Operation::List);
            m.record_operation_completed(Operation::List, OperationOutcome::Success, 7);
        });

        assert!(logs.contains("operation completed"), "{logs}");
        assert!(logs.contains("duration_ms=7"), "{logs}");
        assert!(!logs.contains("operation started"), "{logs}");
    }

    #[test]
    fn runtime_errors_at_debug() {
        let logs = capture(Level::DEBUG, |m| m.record_runtime_error("RemovePod", "not_found"));
        assert!(logs.contains("RemovePod"), "{logs}");
        assert!(logs.contains("not_found"), "{logs}");
    }
}
