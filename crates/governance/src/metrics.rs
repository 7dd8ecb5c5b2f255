//! Metrics implementation using Prometheus.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use concierge_core::{Error, Result};

/// Initialize Prometheus recorder and return the handle.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();

    let handle = builder
        .install_recorder()
        .map_err(|e| Error::internal(format!("Failed to install Prometheus recorder: {}", e)))?;

    tracing::info!("Prometheus metrics recorder initialized");
    Ok(handle)
}

/// Count a routed turn. `fallback` marks turns the router could not place.
pub fn track_route(agent: &str, fallback: bool) {
    metrics::counter!(
        "concierge_routed_turns_total",
        "agent" => agent.to_string(),
        "fallback" => fallback.to_string()
    )
    .increment(1);
}

/// Count a turn rejected by the router model's content filter.
pub fn track_content_filter() {
    metrics::counter!("concierge_content_filter_total").increment(1);
}

/// Record how long a named operation took.
pub fn track_operation(operation: &str, outcome: &str, latency_sec: f64) {
    metrics::histogram!(
        "concierge_operation_duration_seconds",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .record(latency_sec);
}
