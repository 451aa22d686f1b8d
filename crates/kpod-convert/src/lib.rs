//! Default mapping between workload pod specs and runtime payloads.
//!
//! [`DefaultConverter`] is the [`kpod_core::SchemaConverter`] used when the caller has no
//! schema of its own: pods are addressed by name, every object the converter emits carries
//! the `kpod.io/` bookkeeping labels, and those labels are stripped again on the way back.
mod converter;
pub use converter::DefaultConverter;

mod naming;
pub use naming::{SHORT_ID_LEN, container_runtime_name, short_id, validate_key};

mod status;
