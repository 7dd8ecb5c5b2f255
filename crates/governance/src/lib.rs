#![deny(unused)]
//! Observability for Concierge.
//!
//! This crate provides:
//! - Tracing subscriber setup with optional OTLP export
//! - Prometheus metrics for routing decisions
//! - Timing of router, agent, and fallback calls

pub mod metrics;
pub mod performance;
pub mod tracing_layer;

pub use metrics::{setup_metrics_recorder, track_content_filter, track_route};
pub use performance::{OperationStats, PerformanceMonitor};
pub use tracing_layer::configure_tracing;
