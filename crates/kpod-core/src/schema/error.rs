use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("invalid value: {0}")]
    Invalid(String),
}
