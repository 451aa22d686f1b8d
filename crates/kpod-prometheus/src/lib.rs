//! Prometheus backend for reconciler metrics.
//!
//! ```rust
//! use std::sync::Arc;
//! use kpod_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let handle: kpod_core::MetricsHandle = Arc::new(metrics.clone());
//! // reconciler.with_metrics(handle)
//! # let _ = handle;
//!
//! let body = metrics.encode_text()?;
//! assert!(body.is_empty() || body.contains("kpod_"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `kpod_operations_started_total{operation}` counter
//! - `kpod_operations_completed_total{operation, outcome}` counter
//! - `kpod_operation_duration_seconds{operation}` histogram
//! - `kpod_runtime_errors_total{method, error_kind}` counter
//! - `kpod_health_probes_total{result}` counter
//!
//! Serving `/metrics` is left to the embedding application.
mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
