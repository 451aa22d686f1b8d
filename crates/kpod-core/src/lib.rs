pub mod config;
pub mod error;
pub mod metrics;
pub mod reconciler;
pub mod runtime;
pub mod schema;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{HealthCheckConfig, ReconcilerConfig};
pub use error::ReconcileError;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, Operation, OperationOutcome};
pub use reconciler::{CreateStage, Reconciler, deadline_token};
pub use runtime::{Connector, RuntimeClient, RuntimeError};
pub use schema::{ConversionError, SchemaConverter};

pub mod prelude {
    pub use crate::config::ReconcilerConfig;
    pub use crate::error::ReconcileError;
    pub use crate::reconciler::Reconciler;
    pub use crate::runtime::{Connector, RuntimeClient};
    pub use crate::schema::SchemaConverter;
    pub use tokio_util::sync::CancellationToken;
}
