use std::sync::Arc;

use crate::error::ReconcileError;

/// Public reconciler operation, used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    CreateOrUpdate,
    Update,
    Delete,
    Get,
    GetByName,
    List,
}

impl Operation {
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::CreateOrUpdate => "create_or_update",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Get => "get",
            Operation::GetByName => "get_by_name",
            Operation::List => "list",
        }
    }
}

/// How a reconciler operation terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Success,
    Failure,
    NotFound,
    Timeout,
    Cancelled,
}

impl OperationOutcome {
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            OperationOutcome::Success => "success",
            OperationOutcome::Failure => "failure",
            OperationOutcome::NotFound => "not_found",
            OperationOutcome::Timeout => "timeout",
            OperationOutcome::Cancelled => "cancelled",
        }
    }

    /// Classify an operation result.
    pub fn of<T>(result: &Result<T, ReconcileError>) -> Self {
        match result {
            Ok(_) => OperationOutcome::Success,
            Err(ReconcileError::NotFound(_)) => OperationOutcome::NotFound,
            Err(ReconcileError::Timeout { .. }) => OperationOutcome::Timeout,
            Err(ReconcileError::Cancelled) => OperationOutcome::Cancelled,
            Err(_) => OperationOutcome::Failure,
        }
    }
}

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Called once when a public operation begins.
    fn record_operation_started(&self, op: Operation);

    /// Called once when a public operation returns.
    ///
    /// # Arguments
    /// - `op`: the public operation
    /// - `outcome`: how it terminated
    /// - `duration_ms`: wall time including lock wait and delays
    fn record_operation_completed(&self, op: Operation, outcome: OperationOutcome, duration_ms: u64);

    /// Called for every runtime call that returned an error.
    ///
    /// # Arguments
    /// - `method`: runtime method name (e.g. `CreatePod`)
    /// - `error_kind`: [`crate::RuntimeError::kind`]
    fn record_runtime_error(&self, method: &str, error_kind: &str);

    /// Called for every post-start health probe.
    fn record_health_probe(&self, healthy: bool);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_classifies_errors() {
        let ok: Result<(), ReconcileError> = Ok(());
        assert_eq!(OperationOutcome::of(&ok), OperationOutcome::Success);

        let nf: Result<(), _> = Err(ReconcileError::NotFound("x".into()));
        assert_eq!(OperationOutcome::of(&nf), OperationOutcome::NotFound);

        let to: Result<(), _> = Err(ReconcileError::Timeout {
            pod: "x".into(),
            attempts: 1,
        });
        assert_eq!(OperationOutcome::of(&to), OperationOutcome::Timeout);

        let c: Result<(), _> = Err(ReconcileError::Cancelled);
        assert_eq!(OperationOutcome::of(&c).as_label(), "cancelled");

        let v: Result<(), _> = Err(ReconcileError::Validation("bad".into()));
        assert_eq!(OperationOutcome::of(&v), OperationOutcome::Failure);
    }
}
