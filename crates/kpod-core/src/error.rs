use thiserror::Error;

use kpod_model::ModelError;

use crate::{runtime::RuntimeError, schema::ConversionError};

/// Terminal error of a reconciler operation.
///
/// Every public operation returns either a complete result or exactly one of these.
/// Runtime and converter errors pass through with their kind preserved.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("pod not found: {0}")]
    NotFound(String),

    #[error("conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("runtime call {method} failed ({code}): {message}")]
    RuntimeCall {
        method: &'static str,
        code: String,
        message: String,
    },

    #[error("pod '{pod}' did not become healthy after {attempts} attempts")]
    Timeout { pod: String, attempts: u32 },

    #[error("operation cancelled")]
    Cancelled,
}

impl ReconcileError {
    /// Stable, low-cardinality label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ReconcileError::Validation(_) => "validation",
            ReconcileError::Connection(_) => "connection",
            ReconcileError::NotFound(_) => "not_found",
            ReconcileError::Conversion(_) => "conversion",
            ReconcileError::RuntimeCall { .. } => "runtime_call",
            ReconcileError::Timeout { .. } => "timeout",
            ReconcileError::Cancelled => "cancelled",
        }
    }
}

impl From<RuntimeError> for ReconcileError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::Connection(msg) => ReconcileError::Connection(msg),
            RuntimeError::NotFound(what) => ReconcileError::NotFound(what),
            RuntimeError::Call {
                method,
                code,
                message,
            } => ReconcileError::RuntimeCall {
                method,
                code,
                message,
            },
        }
    }
}

impl From<ModelError> for ReconcileError {
    fn from(e: ModelError) -> Self {
        ReconcileError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_errors_keep_their_kind() {
        let e: ReconcileError = RuntimeError::NotFound("web".into()).into();
        assert!(matches!(e, ReconcileError::NotFound(_)));

        let e: ReconcileError = RuntimeError::Connection("refused".into()).into();
        assert_eq!(e.kind(), "connection");

        let e: ReconcileError = RuntimeError::call("StartPod", "io.podman.ErrorOccurred", "boom").into();
        match e {
            ReconcileError::RuntimeCall {
                method,
                code,
                message,
            } => {
                assert_eq!(method, "StartPod");
                assert_eq!(code, "io.podman.ErrorOccurred");
                assert_eq!(message, "boom");
            }
            other => panic!("expected RuntimeCall, got {other:?}"),
        }
    }

    #[test]
    fn model_errors_become_validation() {
        let e: ReconcileError = ModelError::InvalidPod("name is empty".into()).into();
        assert_eq!(e.kind(), "validation");
        assert!(e.to_string().contains("name is empty"));
    }

    #[test]
    fn timeout_message_names_pod_and_attempts() {
        let e = ReconcileError::Timeout {
            pod: "web".into(),
            attempts: 4,
        };
        assert_eq!(
            e.to_string(),
            "pod 'web' did not become healthy after 4 attempts"
        );
    }
}
