use std::sync::Arc;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use kpod_core::{MetricsBackend, Operation, OperationOutcome};

const NAMESPACE: &str = "kpod";

/// Operation latencies: a lone Get is milliseconds, a Create with health polling is
/// hundreds of milliseconds to seconds.
const DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0, 60.0];

/// [`MetricsBackend`] recording into a prometheus [`Registry`].
///
/// All label values come from closed sets (operation names, outcome names, runtime method
/// names and error kinds), so cardinality stays bounded.
#[derive(Clone)]
pub struct PrometheusMetrics {
    started: CounterVec,
    completed: CounterVec,
    duration: HistogramVec,
    runtime_errors: CounterVec,
    health_probes: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Register the metrics in `registry`. Fails if they are already registered there.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let started = counter(
            &registry,
            "operations_started_total",
            "Reconciler operations started",
            &["operation"],
        )?;
        let completed = counter(
            &registry,
            "operations_completed_total",
            "Reconciler operations completed, by outcome",
            &["operation", "outcome"],
        )?;

        let duration = HistogramVec::new(
            HistogramOpts::new(
                "operation_duration_seconds",
                "Reconciler operation wall time, including lock wait and delays",
            )
            .namespace(NAMESPACE)
            .buckets(DURATION_BUCKETS.to_vec()),
            &["operation"],
        )?;
        registry.register(Box::new(duration.clone()))?;

        let runtime_errors = counter(
            &registry,
            "runtime_errors_total",
            "Failed runtime calls",
            &["method", "error_kind"],
        )?;
        let health_probes = counter(
            &registry,
            "health_probes_total",
            "Post-start health probes",
            &["result"],
        )?;

        Ok(Self {
            started,
            completed,
            duration,
            runtime_errors,
            health_probes,
            registry,
        })
    }

    /// Backend with a private registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Current state in the prometheus text exposition format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

fn counter(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> Result<CounterVec, prometheus::Error> {
    let c = CounterVec::new(Opts::new(name, help).namespace(NAMESPACE), labels)?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}

impl MetricsBackend for PrometheusMetrics {
    fn record_operation_started(&self, op: Operation) {
        self.started.with_label_values(&[op.as_label()]).inc();
    }

    fn record_operation_completed(&self, op: Operation, outcome: OperationOutcome, duration_ms: u64) {
        self.completed
            .with_label_values(&[op.as_label(), outcome.as_label()])
            .inc();
        self.duration
            .with_label_values(&[op.as_label()])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_runtime_error(&self, method: &str, error_kind: &str) {
        self.runtime_errors
            .with_label_values(&[method, error_kind])
            .inc();
    }

    fn record_health_probe(&self, healthy: bool) {
        let result = if healthy { "healthy" } else { "unhealthy" };
        self.health_probes.with_label_values(&[result]).inc();
    }
}
