//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog client (requests by outcome, records returned)
//! - Harvest sessions (candidates, rejections, acceptances, duration)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Catalog HTTP attempts by outcome.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "seriesdex_catalog_requests_total",
            "Total catalog requests by outcome",
        ),
        &["outcome"], // "ok", "rate_limited", "http_error", "timeout", "transport_error", "decode_error"
    )
    .unwrap()
});

/// Records returned by successful searches.
pub static CATALOG_RECORDS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "seriesdex_catalog_records_total",
        "Total catalog records returned",
    )
    .unwrap()
});

// =============================================================================
// Harvest Metrics
// =============================================================================

/// Title parser hits.
pub static CANDIDATES_EMITTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "seriesdex_candidates_emitted_total",
            "Series candidates extracted from titles",
        ),
        &["strategy"],
    )
    .unwrap()
});

/// Candidate groups rejected, by reason.
pub static GROUPS_REJECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "seriesdex_groups_rejected_total",
            "Candidate groups rejected",
        ),
        &["reason"], // "low_confidence", "duplicate", "over_limit"
    )
    .unwrap()
});

/// Series accepted into the registry, by category.
pub static SERIES_ACCEPTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("seriesdex_series_accepted_total", "Series accepted"),
        &["category"],
    )
    .unwrap()
});

/// Harvest session duration in seconds.
pub static HARVEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "seriesdex_harvest_duration_seconds",
            "Duration of a harvest session",
        )
        .buckets(vec![1.0, 10.0, 60.0, 300.0, 900.0, 1800.0, 3600.0, 7200.0]),
        &["strategy"],
    )
    .unwrap()
});

/// Confidence of accepted series.
pub static ACCEPTED_CONFIDENCE: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "seriesdex_accepted_confidence",
            "Distribution of accepted confidence scores",
        )
        .buckets(vec![50.0, 60.0, 70.0, 80.0, 85.0, 90.0, 95.0, 100.0]),
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Catalog
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(CATALOG_RECORDS.clone()),
        // Harvest
        Box::new(CANDIDATES_EMITTED.clone()),
        Box::new(GROUPS_REJECTED.clone()),
        Box::new(SERIES_ACCEPTED.clone()),
        Box::new(HARVEST_DURATION.clone()),
        Box::new(ACCEPTED_CONFIDENCE.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        CATALOG_REQUESTS.with_label_values(&["ok"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "seriesdex_catalog_requests_total"));
    }

    #[test]
    fn test_accepted_confidence_is_unlabelled() {
        let before = ACCEPTED_CONFIDENCE.get_sample_count();
        ACCEPTED_CONFIDENCE.observe(88.0);
        assert!(ACCEPTED_CONFIDENCE.get_sample_count() > before);

        let registry = prometheus::Registry::new();
        registry
            .register(Box::new(ACCEPTED_CONFIDENCE.clone()))
            .unwrap();
        let families = registry.gather();
        let family = families
            .iter()
            .find(|f| f.get_name() == "seriesdex_accepted_confidence")
            .unwrap();
        assert!(family.get_metric()[0].get_label().is_empty());
    }
}
