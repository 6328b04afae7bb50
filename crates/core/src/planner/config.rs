//! Planner configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Strategy;

/// Configuration for the query planner (`[planner]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Shuffle the query space before capping.
    #[serde(default)]
    pub shuffle: bool,

    /// Seed for reproducible shuffles. Random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Per-strategy query caps, keyed by strategy name.
    #[serde(default)]
    pub caps: BTreeMap<String, usize>,

    /// First year swept by the decade strategy.
    #[serde(default = "default_decade_start")]
    pub decade_start: i32,

    /// Last year swept by the decade strategy (inclusive).
    #[serde(default = "default_decade_end")]
    pub decade_end: i32,

    /// Highest number paired with each letter in the ordinal sweep.
    #[serde(default = "default_ordinal_max")]
    pub ordinal_max: u32,

    /// Highest number in the numeric sweep.
    #[serde(default = "default_numeric_max")]
    pub numeric_max: u32,
}

fn default_decade_start() -> i32 {
    1950
}

fn default_decade_end() -> i32 {
    2024
}

fn default_ordinal_max() -> u32 {
    20
}

fn default_numeric_max() -> u32 {
    100
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            shuffle: false,
            seed: None,
            caps: BTreeMap::new(),
            decade_start: default_decade_start(),
            decade_end: default_decade_end(),
            ordinal_max: default_ordinal_max(),
            numeric_max: default_numeric_max(),
        }
    }
}

impl PlannerConfig {
    /// Effective cap for a strategy.
    pub fn cap_for(&self, strategy: Strategy) -> usize {
        self.caps
            .get(strategy.as_str())
            .copied()
            .unwrap_or_else(|| strategy.default_cap())
    }
}
