//! Metrics collection and exposition.
//!
//! # Metrics
//! - `logfan_sampling_decisions_total` (counter): by policy, decision
//! - `logfan_broadcasts_total` (counter): payloads handed to the pool
//! - `logfan_subscriber_send_failures_total` (counter): by reason
//! - `logfan_subscribers` (gauge): current subscriber count

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_sampling(policy: &'static str, decision: &'static str) {
    counter!("logfan_sampling_decisions_total", "policy" => policy, "decision" => decision)
        .increment(1);
}

pub fn record_broadcast() {
    counter!("logfan_broadcasts_total").increment(1);
}

pub fn record_send_failure(reason: &'static str) {
    counter!("logfan_subscriber_send_failures_total", "reason" => reason).increment(1);
}

pub fn record_subscribers(count: usize) {
    gauge!("logfan_subscribers").set(count as f64);
}
