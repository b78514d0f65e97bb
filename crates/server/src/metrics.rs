//! Prometheus metrics for the server process.
//!
//! Owns the global registry: server-side counters plus everything
//! `clipstitch_core::metrics` exports, encoded for the `/metrics` endpoint.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Updates received from the transport.
pub static UPDATES_RECEIVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "clipstitch_updates_received_total",
        "Total transport updates received",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(UPDATES_RECEIVED.clone()))
        .unwrap();

    for metric in clipstitch_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
