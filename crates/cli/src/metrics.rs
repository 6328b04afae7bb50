//! Prometheus metrics for batch runs.
//!
//! A harvest is a batch job, so metrics are written once at the end of the
//! run as a Prometheus text file (node-exporter textfile-collector style)
//! instead of being scraped:
//! - Run outcomes per command
//! - Registry size after the run
//! - Core catalog and harvest metrics

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{self, Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// Run Metrics
// =============================================================================

/// Completed runs by command and outcome.
pub static RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("seriesdex_runs_total", "Completed CLI runs"),
        &["command", "outcome"], // outcome: "ok", "cancelled", "error"
    )
    .unwrap()
});

/// Entries in the registry after the last session.
pub static REGISTRY_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "seriesdex_registry_entries",
        "Number of entries in the series registry",
    )
    .unwrap()
});

/// Unix time of the last successful run.
pub static LAST_SUCCESS_TIMESTAMP: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "seriesdex_last_success_timestamp_seconds",
        "Unix timestamp of the last successful run",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    registry.register(Box::new(RUNS_TOTAL.clone())).unwrap();
    registry
        .register(Box::new(REGISTRY_ENTRIES.clone()))
        .unwrap();
    registry
        .register(Box::new(LAST_SUCCESS_TIMESTAMP.clone()))
        .unwrap();

    // Core metrics (catalog client, harvest sessions)
    for metric in seriesdex_core::metrics::all_metrics() {
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

/// Write the text exposition to `path`, replacing it atomically.
pub fn write_metrics(path: &Path) -> Result<()> {
    let temp = path.with_extension("prom.tmp");
    std::fs::write(&temp, encode_metrics())
        .with_context(|| format!("Failed to write metrics to {}", temp.display()))?;
    std::fs::rename(&temp, path)
        .with_context(|| format!("Failed to move metrics into {}", path.display()))?;
    Ok(())
}
