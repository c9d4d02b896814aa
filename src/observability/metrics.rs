//! Metrics collection and exposition.
//!
//! # Metrics
//! - `viewer_logins_total` (counter): login attempts by `outcome`
//! - `viewer_logouts_total` (counter)
//! - `viewer_active_sessions` (gauge): entries in the session store
//! - `viewer_sweeps_total` (counter): logout sweep ticks
//! - `viewer_access_denied_total` (counter): redirects by `reason`
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Serve Prometheus metrics on `addr`. Must be called inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_login(outcome: &'static str) {
    metrics::counter!("viewer_logins_total", "outcome" => outcome).increment(1);
}

pub fn record_logout() {
    metrics::counter!("viewer_logouts_total").increment(1);
}

pub fn record_sessions(active: usize) {
    metrics::gauge!("viewer_active_sessions").set(active as f64);
}

pub fn record_sweep() {
    metrics::counter!("viewer_sweeps_total").increment(1);
}

pub fn record_access_denied(reason: &'static str) {
    metrics::counter!("viewer_access_denied_total", "reason" => reason).increment(1);
}
