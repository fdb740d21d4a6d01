//! Metrics collection and exposition.
//!
//! # Metrics
//! - `datamgr_submissions_total` (counter): submissions by route, status
//! - `datamgr_submission_duration_seconds` (histogram): handling latency by route
//!
//! Unmatched paths are recorded under route `none` to bound label cardinality.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Route label used for requests that matched no route.
pub const NO_ROUTE: &str = "none";

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one request.
pub fn record_submission(route: &str, status: u16, start: Instant) {
    let route = route.to_string();
    metrics::counter!(
        "datamgr_submissions_total",
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("datamgr_submission_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}
