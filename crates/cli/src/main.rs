//! SeriesDex CLI - harvest book series into the registry.

mod commands;
mod metrics;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seriesdex_core::{
    load_config_or_default, validate_config, Config, ConfigError, HarvestError, RegistryError,
    Strategy,
};

/// Exit code for invalid arguments or configuration.
const EXIT_USAGE: u8 = 2;

/// SeriesDex - discover multi-volume book series from a public catalog.
#[derive(Debug, Parser)]
#[command(name = "seriesdex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: seriesdex.toml if present).
    #[arg(long, global = true, env = "SERIESDEX_CONFIG")]
    config: Option<PathBuf>,

    /// Cap on accepted series per session.
    #[arg(long, global = true)]
    limit: Option<usize>,

    /// Hard ceiling on catalog calls per session.
    #[arg(long, global = true)]
    api_cap: Option<u64>,

    /// Skip the registry write and only print the report.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Registry file path.
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Minimum confidence (0-100) for acceptance.
    #[arg(long, global = true)]
    accept_threshold: Option<u32>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Write Prometheus metrics to this file after the run.
    #[arg(long, global = true)]
    metrics_out: Option<PathBuf>,

    /// Also write the harvest report(s) as JSON to this file.
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Harvest with curated series keywords.
    Keyword,
    /// Harvest with prolific series authors.
    Author,
    /// Harvest with known franchise names and aliases.
    Franchise,
    /// Harvest with series-heavy publishers.
    Publisher,
    /// Harvest with non-English series terms.
    Language,
    /// Harvest by first-publication year.
    Decade,
    /// Harvest by subject genre.
    Genre,
    /// Harvest with ordinal title patterns ("Book A 3").
    Ordinal,
    /// Harvest with numbered title patterns ("Volume 12").
    Numeric,
    /// Run every strategy in turn.
    All,
    /// Summarize the registry.
    Stats,
    /// Fetch one catalog work as JSON.
    Lookup {
        /// Work key, e.g. /works/OL45883W or OL45883W.
        key: String,
    },
}

impl Commands {
    fn strategy(&self) -> Option<Strategy> {
        match self {
            Commands::Keyword => Some(Strategy::Keyword),
            Commands::Author => Some(Strategy::Author),
            Commands::Franchise => Some(Strategy::Franchise),
            Commands::Publisher => Some(Strategy::Publisher),
            Commands::Language => Some(Strategy::Language),
            Commands::Decade => Some(Strategy::Decade),
            Commands::Genre => Some(Strategy::Genre),
            Commands::Ordinal => Some(Strategy::Ordinal),
            Commands::Numeric => Some(Strategy::Numeric),
            Commands::All | Commands::Stats | Commands::Lookup { .. } => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Commands::All => "all",
            Commands::Stats => "stats",
            Commands::Lookup { .. } => "lookup",
            other => other.strategy().map(|s| s.as_str()).unwrap_or("unknown"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let outcome = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
        .and_then(|runtime| runtime.block_on(commands::execute(&cli, &config)));

    let code = match &outcome {
        Ok(()) => 0,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("error: {:#}", e);
            exit_code_for(e)
        }
    };

    metrics::RUNS_TOTAL
        .with_label_values(&[cli.command.name(), outcome_label(code)])
        .inc();
    if let Some(path) = &cli.metrics_out {
        if let Err(e) = metrics::write_metrics(path) {
            error!("{:#}", e);
        }
    }

    ExitCode::from(code)
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries reports; logs go to stderr.
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Load the config file and apply command-line overrides.
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("Failed to load config from {}", path.display()),
            None => "Failed to load configuration".to_string(),
        }
    })?;

    if let Some(limit) = cli.limit {
        config.harvest.max_accepted = Some(limit);
    }
    if let Some(api_cap) = cli.api_cap {
        config.harvest.api_cap = Some(api_cap);
    }
    if cli.dry_run {
        config.harvest.dry_run = true;
    }
    if let Some(path) = &cli.registry {
        config.registry.path = path.clone();
    }
    if let Some(threshold) = cli.accept_threshold {
        config.harvest.accept_threshold = threshold;
    }

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<HarvestError>() {
        return u8::try_from(e.exit_code()).unwrap_or(1);
    }
    if err.downcast_ref::<RegistryError>().is_some() {
        return 1;
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return EXIT_USAGE;
    }
    1
}

fn outcome_label(code: u8) -> &'static str {
    match code {
        0 => "ok",
        130 => "cancelled",
        _ => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy_subcommand_with_options() {
        let cli = Cli::try_parse_from([
            "seriesdex",
            "keyword",
            "--limit",
            "5",
            "--api-cap",
            "20",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.command.strategy(), Some(Strategy::Keyword));
        assert_eq!(cli.limit, Some(5));
        assert_eq!(cli.api_cap, Some(20));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_parse_lookup() {
        let cli = Cli::try_parse_from(["seriesdex", "lookup", "OL45883W"]).unwrap();
        assert!(matches!(cli.command, Commands::Lookup { ref key } if key == "OL45883W"));
        assert_eq!(cli.command.name(), "lookup");
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        assert!(Cli::try_parse_from(["seriesdex"]).is_err());
        assert!(Cli::try_parse_from(["seriesdex", "bogus"]).is_err());
        assert!(Cli::try_parse_from(["seriesdex", "numeric", "--limit", "many"]).is_err());
    }

    #[test]
    fn test_every_strategy_has_a_subcommand() {
        for strategy in Strategy::ALL {
            let cli = Cli::try_parse_from(["seriesdex", strategy.as_str()]).unwrap();
            assert_eq!(cli.command.strategy(), Some(strategy));
            assert_eq!(cli.command.name(), strategy.as_str());
        }
    }

    #[test]
    fn test_exit_codes() {
        let corrupt = anyhow::Error::from(HarvestError::from(RegistryError::Corrupt {
            path: PathBuf::from("r.json"),
            reason: "bad".to_string(),
        }));
        assert_eq!(exit_code_for(&corrupt), 1);

        let cancelled = anyhow::Error::from(HarvestError::Aborted("ctrl-c".to_string()));
        assert_eq!(exit_code_for(&cancelled), 130);

        let config = anyhow::Error::from(ConfigError::ValidationError("x".to_string()))
            .context("Configuration validation failed");
        assert_eq!(exit_code_for(&config), EXIT_USAGE);

        assert_eq!(exit_code_for(&anyhow::anyhow!("other")), 1);
    }

    #[test]
    fn test_overrides_applied() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("seriesdex.toml");
        std::fs::write(&config_path, "[harvest]\naccept_threshold = 75\n").unwrap();

        let cli = Cli::try_parse_from([
            "seriesdex",
            "--config",
            config_path.to_str().unwrap(),
            "genre",
            "--accept-threshold",
            "80",
            "--registry",
            "/tmp/other.json",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.harvest.accept_threshold, 80);
        assert_eq!(config.registry.path, PathBuf::from("/tmp/other.json"));
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("seriesdex.toml");
        std::fs::write(&config_path, "").unwrap();
        let cli = Cli::try_parse_from([
            "seriesdex",
            "--config",
            config_path.to_str().unwrap(),
            "stats",
            "--accept-threshold",
            "150",
        ])
        .unwrap();
        let err = build_config(&cli).unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_USAGE);
    }
}
