//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, backend
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//! - `route_table_entries` (gauge): routing keys in the published table
//! - `route_table_domains` (gauge): hosts eligible for certificates
//! - `registry_refresh_total` (counter): reconcile cycles by outcome
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests need no setup

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one proxied request.
pub fn record_request(method: &str, status: u16, backend: &str, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    let backend = backend.to_string();
    counter!(
        "proxy_requests_total",
        "method" => method.clone(),
        "status" => status.clone(),
        "backend" => backend.clone()
    )
    .increment(1);
    histogram!(
        "proxy_request_duration_seconds",
        "method" => method,
        "status" => status,
        "backend" => backend
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the size of a freshly published route table.
pub fn record_route_table(entries: usize, domains: usize) {
    gauge!("route_table_entries").set(entries as f64);
    gauge!("route_table_domains").set(domains as f64);
}

/// Record the outcome of a reconcile cycle (`success` or `failure`).
pub fn record_refresh(outcome: &'static str) {
    counter!("registry_refresh_total", "outcome" => outcome).increment(1);
}
