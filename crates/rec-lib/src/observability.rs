//! Observability infrastructure for the recommendation service
//!
//! Provides:
//! - Prometheus metrics (request counts, upstream errors, chat latency)
//! - Structured JSON logging for lifecycle events

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, GaugeVec, Histogram, IntCounter,
};
use std::sync::OnceLock;
use tracing::info;

/// Histogram buckets for chat round-trip latency (in seconds); the
/// outbound call is bounded by a timeout in the tens of seconds
const CHAT_LATENCY_BUCKETS: &[f64] = &[0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    requests_total: IntCounter,
    upstream_errors_total: IntCounter,
    chat_latency_seconds: Histogram,
    model_info: GaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            requests_total: register_int_counter!(
                "llm_rec_requests_total",
                "Total number of recommendation requests received"
            )
            .expect("Failed to register requests_total"),

            upstream_errors_total: register_int_counter!(
                "llm_rec_upstream_errors_total",
                "Total number of failed model backend calls"
            )
            .expect("Failed to register upstream_errors_total"),

            chat_latency_seconds: register_histogram!(
                "llm_rec_chat_latency_seconds",
                "Round-trip time of chat calls to the model backend",
                CHAT_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register chat_latency_seconds"),

            model_info: register_gauge_vec!(
                "llm_rec_model_info",
                "Information about the configured model",
                &["model"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Count one inbound recommendation request
    pub fn inc_requests(&self) {
        self.inner().requests_total.inc();
    }

    /// Count one failed model backend call
    pub fn inc_upstream_errors(&self) {
        self.inner().upstream_errors_total.inc();
    }

    /// Record the round-trip latency of one chat call
    pub fn observe_chat_latency(&self, duration_secs: f64) {
        self.inner().chat_latency_seconds.observe(duration_secs);
    }

    /// Record the configured model identifier
    pub fn set_model(&self, model: &str) {
        self.inner().model_info.reset();
        self.inner().model_info.with_label_values(&[model]).set(1.0);
    }
}

/// Structured logger for service lifecycle events
#[derive(Clone)]
pub struct StructuredLogger {
    model: String,
}

impl StructuredLogger {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, ollama_host: &str) {
        info!(
            event = "service_started",
            version = %version,
            model = %self.model,
            ollama_host = %ollama_host,
            "Recommendation service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_stopped",
            model = %self.model,
            reason = %reason,
            "Recommendation service stopped"
        );
    }
}
