use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::OpenLibraryConfig;
use crate::harvest::HarvestConfig;
use crate::planner::PlannerConfig;
use crate::scoring::ScoringConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub catalog: OpenLibraryConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Registry file configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,
    /// Backup directory (default: `backups/` next to the registry file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
            backup_dir: None,
        }
    }
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("series_registry.json")
}
