//! Distributed tracing configuration.

use concierge_core::{Error, Result};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace as sdktrace, Resource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Configure tracing with stdout logging and, when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set, OpenTelemetry export.
///
/// `LOG_FORMAT=json` switches stdout to one JSON object per event.
pub fn configure_tracing() -> Result<()> {
    // Basic EnvFilter
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,concierge=debug".into()),
    );

    // Stdout formatting layer
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let fmt_layer = if json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    // Registry with fmt and filter
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    // Check OTLP endpoint
    if let Ok(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        let provider = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(endpoint.clone()),
            )
            .with_trace_config(sdktrace::Config::default().with_resource(Resource::new(vec![
                KeyValue::new("service.name", "concierge"),
            ])))
            .install_batch(runtime::Tokio)
            .map_err(|e| Error::internal(format!("Failed to install OTLP pipeline: {}", e)))?;

        let tracer = provider.tracer("concierge");
        opentelemetry::global::set_tracer_provider(provider);
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        registry.with(otel_layer).init();
        tracing::info!(endpoint = %endpoint, "OpenTelemetry tracing initialized");
    } else {
        registry.init();
    }

    Ok(())
}
