use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid pod spec: {0}")]
    InvalidPod(String),

    #[error("invalid container spec '{container}': {reason}")]
    InvalidContainer { container: String, reason: String },
}

pub type ModelResult<T> = Result<T, ModelError>;
