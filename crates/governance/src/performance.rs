//! Timing of named operations.
//!
//! Durations are kept in memory for summaries and mirrored to the
//! `concierge_operation_duration_seconds` histogram.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::metrics::track_operation;

#[derive(Debug, Clone)]
struct Sample {
    duration: Duration,
    info: String,
}

/// Aggregate over all samples of one operation, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationStats {
    pub count: usize,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub total: f64,
}

impl OperationStats {
    fn from_durations(mut secs: Vec<f64>) -> Option<Self> {
        if secs.is_empty() {
            return None;
        }
        secs.sort_by(|a, b| a.total_cmp(b));
        let count = secs.len();
        let total: f64 = secs.iter().sum();
        let median = if count % 2 == 1 {
            secs[count / 2]
        } else {
            (secs[count / 2 - 1] + secs[count / 2]) / 2.0
        };
        Some(Self {
            count,
            avg: total / count as f64,
            min: secs[0],
            max: secs[count - 1],
            median,
            total,
        })
    }
}

/// Records how long named operations take.
#[derive(Default)]
pub struct PerformanceMonitor {
    samples: Mutex<HashMap<String, Vec<Sample>>>,
    started: Mutex<HashMap<String, Instant>>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing `operation`. Restarting an open timer resets it.
    pub fn start_timer(&self, operation: &str) {
        self.started
            .lock()
            .unwrap()
            .insert(operation.to_string(), Instant::now());
    }

    /// Stop timing `operation` and return the elapsed seconds, or `0.0` if
    /// no timer was running.
    pub fn end_timer(&self, operation: &str, info: &str) -> f64 {
        let started = self.started.lock().unwrap().remove(operation);
        match started {
            Some(start) => {
                let elapsed = start.elapsed();
                self.record(operation, elapsed, info);
                elapsed.as_secs_f64()
            }
            None => 0.0,
        }
    }

    /// Record a measured duration.
    pub fn record(&self, operation: &str, duration: Duration, info: &str) {
        let outcome = if info.starts_with("error") { "error" } else { "success" };
        track_operation(operation, outcome, duration.as_secs_f64());
        tracing::info!(
            operation = operation,
            elapsed_ms = duration.as_millis() as u64,
            info = info,
            "[PERF]"
        );

        self.samples
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push(Sample {
                duration,
                info: info.to_string(),
            });
    }

    /// Await `fut` and record its duration, tagged with its outcome.
    pub async fn time<F, T, E>(&self, operation: &str, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let start = Instant::now();
        let result = fut.await;
        let info = match &result {
            Ok(_) => "success".to_string(),
            Err(e) => format!("error: {}", e),
        };
        self.record(operation, start.elapsed(), &info);
        result
    }

    /// Statistics for one operation.
    pub fn stats(&self, operation: &str) -> Option<OperationStats> {
        let samples = self.samples.lock().unwrap();
        let secs = samples
            .get(operation)?
            .iter()
            .map(|s| s.duration.as_secs_f64())
            .collect();
        OperationStats::from_durations(secs)
    }

    /// Statistics for every recorded operation, ordered by name.
    pub fn all_stats(&self) -> BTreeMap<String, OperationStats> {
        let samples = self.samples.lock().unwrap();
        samples
            .iter()
            .filter_map(|(name, s)| {
                let secs = s.iter().map(|x| x.duration.as_secs_f64()).collect();
                OperationStats::from_durations(secs).map(|st| (name.clone(), st))
            })
            .collect()
    }

    /// Info strings recorded for `operation`, oldest first.
    pub fn outcomes(&self, operation: &str) -> Vec<String> {
        self.samples
            .lock()
            .unwrap()
            .get(operation)
            .map(|s| s.iter().map(|x| x.info.clone()).collect())
            .unwrap_or_default()
    }

    /// Drop all samples and running timers.
    pub fn clear(&self) {
        self.samples.lock().unwrap().clear();
        self.started.lock().unwrap().clear();
    }

    /// Log a one-line summary per operation.
    pub fn log_summary(&self) {
        let stats = self.all_stats();
        if stats.is_empty() {
            tracing::info!("No performance metrics recorded");
            return;
        }
        for (operation, s) in stats {
            tracing::info!(
                operation = %operation,
                calls = s.count,
                avg_s = s.avg,
                min_s = s.min,
                max_s = s.max,
                total_s = s.total,
                "Performance summary"
            );
        }
    }
}
