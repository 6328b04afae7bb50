//! Harvest session configuration.

use serde::{Deserialize, Serialize};

/// Configuration for harvest sessions (`[harvest]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Minimum confidence (0-100) for a group to be persisted.
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: u32,

    /// Confidence at which a single-record, single-volume group is still
    /// accepted. Values above 100 disable the escape.
    #[serde(default = "default_high_singleton_threshold")]
    pub high_singleton_threshold: u32,

    /// Hard ceiling on catalog searches per session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_cap: Option<u64>,

    /// Cap on series accepted per session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_accepted: Option<usize>,

    /// Skip the registry write.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_accept_threshold() -> u32 {
    70
}

fn default_high_singleton_threshold() -> u32 {
    90
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            accept_threshold: default_accept_threshold(),
            high_singleton_threshold: default_high_singleton_threshold(),
            api_cap: None,
            max_accepted: None,
            dry_run: false,
        }
    }
}
