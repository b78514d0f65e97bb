//! Prometheus metrics for core components.
//!
//! Counters and histograms for clip intake and merge pipeline runs. The
//! server crate registers these into its registry and serves them on
//! `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Clips saved into sessions.
pub static CLIPS_RECEIVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "clipstitch_clips_received_total",
        "Total clips saved into user sessions",
    )
    .unwrap()
});

/// Merge attempts by result.
pub static MERGES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("clipstitch_merges_total", "Total merge attempts"),
        &["result"], // "success", "concat", "watermark", "io", "precondition", "too_few"
    )
    .unwrap()
});

/// End-to-end merge duration in seconds.
pub static MERGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "clipstitch_merge_duration_seconds",
            "Duration of merge pipeline runs",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        &["result"],
    )
    .unwrap()
});

/// Per-stage duration in seconds.
pub static STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "clipstitch_stage_duration_seconds",
            "Duration of individual pipeline stages",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["stage"], // "concat", "watermark"
    )
    .unwrap()
});

/// Session resets requested by users.
pub static RESETS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "clipstitch_resets_total",
        "Total session resets requested by users",
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CLIPS_RECEIVED.clone()),
        Box::new(MERGES_TOTAL.clone()),
        Box::new(MERGE_DURATION.clone()),
        Box::new(STAGE_DURATION.clone()),
        Box::new(RESETS_TOTAL.clone()),
    ]
}
