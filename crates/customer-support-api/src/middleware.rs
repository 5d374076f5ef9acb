//! HTTP middleware for request logging and metrics.

use crate::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Header carrying the per-request correlation id
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Correlation id attached to request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

/// Request logging middleware with correlation ID tracking
///
/// Reuses the caller's `x-correlation-id` when present, otherwise generates
/// one. The id lives on the request span, in request extensions and on the
/// response. Completion is logged once, at a level chosen by status class.
#[instrument(name = "request", skip_all, fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id = tracing::field::Empty,
))]
pub async fn request_logging_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let correlation_id = correlation_id_for(&request);

    tracing::Span::current().record("correlation_id", correlation_id.as_str());
    request
        .extensions_mut()
        .insert(CorrelationId(correlation_id.clone()));
    debug!("Request started");

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&correlation_id) {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header_value);
    }

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;
    match response.status() {
        s if s.is_server_error() => error!(status, duration_ms, "Request failed"),
        s if s.is_client_error() => warn!(status, duration_ms, "Request rejected"),
        _ => info!(status, duration_ms, "Request completed"),
    }

    response
}

fn correlation_id_for(request: &Request) -> String {
    request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Metrics collection middleware
///
/// Labels requests by their matched route template so unknown paths collapse
/// into a single `unmatched` series.
pub async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    state.metrics.record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}

#[cfg(test)]
#[path = "middleware_tests.rs"]
mod tests;
