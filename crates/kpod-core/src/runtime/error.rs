use thiserror::Error;

/// Error contract of the runtime's remote-procedure interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The control endpoint could not be reached or the session broke.
    #[error("connection error: {0}")]
    Connection(String),

    /// The addressed pod (or the pod a container should join) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The runtime answered the call with an error.
    #[error("{method} failed ({code}): {message}")]
    Call {
        method: &'static str,
        code: String,
        message: String,
    },
}

impl RuntimeError {
    pub fn call(method: &'static str, code: impl Into<String>, message: impl Into<String>) -> Self {
        RuntimeError::Call {
            method,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::Connection(_) => "connection",
            RuntimeError::NotFound(_) => "not_found",
            RuntimeError::Call { .. } => "call",
        }
    }
}
