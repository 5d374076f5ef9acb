//! Metrics collection for the API service.

use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

/// Service metrics for observability
///
/// Each instance owns its registry, so several routers can coexist in one
/// process without name clashes.
pub struct ServiceMetrics {
    registry: Registry,

    // HTTP request metrics
    pub http_requests_total: IntCounterVec,
    pub http_request_duration: Histogram,

    // Webhook processing metrics
    pub webhook_events_received: IntCounter,
    pub webhook_events_rejected: IntCounterVec,

    // Refresh trigger metrics
    pub rag_update_jobs_started: IntCounter,
}

impl ServiceMetrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;
        let http_request_duration = Histogram::with_opts(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request processing time",
            )
            .buckets(vec![0.001, 0.01, 0.1, 1.0, 10.0]),
        )?;
        let webhook_events_received = IntCounter::new(
            "webhook_events_received_total",
            "Webhook events accepted",
        )?;
        let webhook_events_rejected = IntCounterVec::new(
            Opts::new(
                "webhook_events_rejected_total",
                "Webhook requests rejected, by reason",
            ),
            &["reason"],
        )?;
        let rag_update_jobs_started = IntCounter::new(
            "rag_update_jobs_started_total",
            "RAG update jobs handed out",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(webhook_events_received.clone()))?;
        registry.register(Box::new(webhook_events_rejected.clone()))?;
        registry.register(Box::new(rag_update_jobs_started.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration,
            webhook_events_received,
            webhook_events_rejected,
            rag_update_jobs_started,
        }))
    }

    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration: Duration) {
        let status = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status.as_str()])
            .inc();
        self.http_request_duration.observe(duration.as_secs_f64());
    }

    pub fn record_webhook_received(&self) {
        self.webhook_events_received.inc();
    }

    pub fn record_webhook_rejected(&self, reason: &str) {
        self.webhook_events_rejected
            .with_label_values(&[reason])
            .inc();
    }

    pub fn record_rag_job_started(&self) {
        self.rag_update_jobs_started.inc();
    }

    /// Render all metrics in the Prometheus text format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
