//! Tests for service metrics.

use super::*;

#[test]
fn test_instances_do_not_clash() {
    let first = ServiceMetrics::new();
    let second = ServiceMetrics::new();

    assert!(first.is_ok());
    assert!(second.is_ok());
}

#[test]
fn test_counters_track_events() {
    let metrics = ServiceMetrics::new().unwrap();

    metrics.record_webhook_received();
    metrics.record_webhook_received();
    metrics.record_webhook_rejected("invalid_payload");
    metrics.record_rag_job_started();

    assert_eq!(metrics.webhook_events_received.get(), 2);
    assert_eq!(
        metrics
            .webhook_events_rejected
            .with_label_values(&["invalid_payload"])
            .get(),
        1
    );
    assert_eq!(metrics.rag_update_jobs_started.get(), 1);
}

#[test]
fn test_encode_renders_recorded_requests() {
    let metrics = ServiceMetrics::new().unwrap();
    metrics.record_http_request("GET", "/health", 200, Duration::from_millis(3));

    let text = metrics.encode().unwrap();

    assert!(text.contains("http_requests_total"));
    assert!(text.contains("path=\"/health\""));
    assert!(text.contains("http_request_duration_seconds"));
}
