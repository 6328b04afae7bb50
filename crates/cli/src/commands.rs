//! Subcommand implementations.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use seriesdex_core::{
    Catalog, Config, HarvestDriver, HarvestError, JsonRegistryStore, OpenLibraryClient,
    QueryPlanner, Registry,
};

use crate::metrics;
use crate::{Cli, Commands};

/// Run the selected subcommand.
pub async fn execute(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Stats => stats(config),
        Commands::Lookup { key } => lookup(config, key).await,
        Commands::All => {
            let driver = build_driver(config)?;
            let reports = driver.run_all().await;
            let reports = finish_harvest(&driver, reports)?;
            emit_report(&reports, cli.report.as_deref())?;
            if driver.is_cancelled() {
                return Err(HarvestError::Aborted("interrupted".to_string()).into());
            }
            Ok(())
        }
        command => {
            let strategy = command
                .strategy()
                .context("subcommand is not a harvest strategy")?;
            let driver = build_driver(config)?;
            let report = driver.run(strategy).await;
            let report = finish_harvest(&driver, report)?;
            emit_report(&report, cli.report.as_deref())?;
            if report.cancelled {
                return Err(HarvestError::Aborted("interrupted".to_string()).into());
            }
            Ok(())
        }
    }
}

fn store_for(config: &Config) -> JsonRegistryStore {
    let store = JsonRegistryStore::new(&config.registry.path);
    match &config.registry.backup_dir {
        Some(dir) => store.with_backup_dir(dir),
        None => store,
    }
}

fn build_driver(config: &Config) -> Result<HarvestDriver> {
    let client =
        OpenLibraryClient::new(config.catalog.clone()).context("Failed to build catalog client")?;
    let catalog: Arc<dyn Catalog> = Arc::new(client);

    let driver = HarvestDriver::new(catalog, store_for(config), config.harvest.clone())
        .with_planner(QueryPlanner::with_config(config.planner.clone()))
        .with_scoring(config.scoring.clone())
        .with_page_limit(config.catalog.page_limit);

    spawn_ctrl_c_handler(driver.cancel_flag());

    info!(
        registry = %config.registry.path.display(),
        catalog = %config.catalog.base_url,
        "Harvest driver ready"
    );
    Ok(driver)
}

/// First Ctrl-C asks the driver to wrap up with what it has.
fn spawn_ctrl_c_handler(cancel: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing with partial results");
            cancel.store(true, Ordering::SeqCst);
        }
    });
}

/// Record post-run registry metrics.
fn finish_harvest<T>(driver: &HarvestDriver, result: Result<T, HarvestError>) -> Result<T> {
    let value = result?;
    if let Ok(registry) = driver.store().load() {
        metrics::REGISTRY_ENTRIES.set(registry.len() as i64);
    }
    if !driver.is_cancelled() {
        metrics::LAST_SUCCESS_TIMESTAMP.set(chrono::Utc::now().timestamp());
    }
    Ok(value)
}

fn emit_report<T: Serialize>(report: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{}", json);
    if let Some(path) = path {
        std::fs::write(path, format!("{}\n", json))
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }
    Ok(())
}

/// Registry summary printed by `stats`.
#[derive(Debug, Serialize)]
struct RegistryStats {
    path: String,
    total: usize,
    skipped_malformed: usize,
    by_category: BTreeMap<String, usize>,
    by_source: BTreeMap<String, usize>,
    auto_generated: usize,
}

impl RegistryStats {
    fn from_registry(path: &Path, registry: &Registry) -> Self {
        let mut by_category = BTreeMap::new();
        let mut by_source = BTreeMap::new();
        for entry in &registry.entries {
            *by_category
                .entry(entry.category.as_str().to_string())
                .or_insert(0) += 1;
            *by_source.entry(entry.source.clone()).or_insert(0) += 1;
        }
        Self {
            path: path.display().to_string(),
            total: registry.len(),
            skipped_malformed: registry.skipped,
            by_category,
            by_source,
            auto_generated: registry.entries.iter().filter(|e| e.auto_generated).count(),
        }
    }
}

fn stats(config: &Config) -> Result<()> {
    let store = store_for(config);
    let registry = store
        .load()
        .with_context(|| format!("Failed to load registry {}", store.path().display()))?;
    metrics::REGISTRY_ENTRIES.set(registry.len() as i64);

    let stats = RegistryStats::from_registry(store.path(), &registry);
    emit_report(&stats, None)
}

async fn lookup(config: &Config, key: &str) -> Result<()> {
    let client =
        OpenLibraryClient::new(config.catalog.clone()).context("Failed to build catalog client")?;
    let work = client
        .work(key)
        .await
        .with_context(|| format!("Failed to fetch work {}", key))?;

    match work {
        Some(work) => emit_report(&work, None),
        None => anyhow::bail!("Work {} not found", key),
    }
}
