//! Metrics collection and exposition.
//!
//! # Metrics
//! - `todo_requests_total` (counter): total requests by method, status
//! - `todo_request_duration_seconds` (histogram): latency distribution
//! - `todo_requests_rate_limited_total` (counter): admission rejections

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(err) => tracing::error!(error = %err, "failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("todo_requests_total", &labels).increment(1);
    metrics::histogram!("todo_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    metrics::counter!("todo_requests_rate_limited_total").increment(1);
}

/// Middleware recording request counters and latency.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
