//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ssr_renders_total` (counter): renders by outcome
//! - `ssr_render_duration_seconds` (histogram): render latency
//! - `ssr_renderer_rebuilds_total` (counter): renderers published
//! - `ssr_build_events_total` (counter): build events by side and outcome
//! - `dev_proxy_requests_total` (counter): proxied requests by status
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter is opt-in

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::build::BuildSide;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_render(ok: bool, start: Instant) {
    let outcome = if ok { "ok" } else { "error" };
    counter!("ssr_renders_total", "outcome" => outcome).increment(1);
    histogram!("ssr_render_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_renderer_rebuild() {
    counter!("ssr_renderer_rebuilds_total").increment(1);
}

pub fn record_build(side: BuildSide, ok: bool) {
    let outcome = if ok { "succeeded" } else { "failed" };
    counter!("ssr_build_events_total", "side" => side.as_str(), "outcome" => outcome).increment(1);
}

pub fn record_proxy(status: u16) {
    counter!("dev_proxy_requests_total", "status" => status.to_string()).increment(1);
}
