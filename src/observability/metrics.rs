//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency by method
//! - `predictor_invocations_total` (counter): invocations by outcome
//! - `predictor_invocation_duration_seconds` (histogram): child process wall time
//!
//! Without an installed recorder every call here is a no-op, so handlers
//! record unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// `outcome` is `"success"` or a failure category.
pub fn record_invocation(outcome: &'static str, start: Instant) {
    metrics::counter!("predictor_invocations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("predictor_invocation_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
