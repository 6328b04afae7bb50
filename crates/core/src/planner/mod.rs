//! Query planning.
//!
//! Each [`Strategy`] enumerates a finite search space over the catalog's
//! query grammar. The planner expands it, drops duplicates, optionally
//! shuffles, and applies the per-strategy cap.

mod config;
mod strategy;
pub mod vocab;

pub use config::PlannerConfig;
pub use strategy::Strategy;

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use vocab::{
    FRANCHISES, GENRES, LANGUAGE_TERMS, NUMERIC_PREFIXES, ORDINAL_PREFIXES, PROLIFIC_AUTHORS,
    SERIES_KEYWORDS, SERIES_PUBLISHERS,
};

/// Generates the query sequence for a strategy.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    config: PlannerConfig,
}

impl QueryPlanner {
    /// Create a new planner with default config.
    pub fn new() -> Self {
        Self {
            config: PlannerConfig::default(),
        }
    }

    /// Create a new planner with custom config.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan queries for a strategy using its configured cap.
    pub fn plan(&self, strategy: Strategy) -> Vec<String> {
        self.plan_with_cap(strategy, self.config.cap_for(strategy))
    }

    /// Plan at most `cap` distinct queries for a strategy.
    pub fn plan_with_cap(&self, strategy: Strategy, cap: usize) -> Vec<String> {
        let mut queries = Vec::new();
        let mut seen = HashSet::new();

        for query in self.expand(strategy) {
            add_query(&mut queries, &mut seen, query);
        }

        if self.config.shuffle {
            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            queries.shuffle(&mut rng);
        }

        queries.truncate(cap);
        queries
    }

    /// Full, unbounded query space for a strategy (duplicates possible).
    fn expand(&self, strategy: Strategy) -> Vec<String> {
        match strategy {
            Strategy::Keyword => SERIES_KEYWORDS
                .iter()
                .map(|kw| format!("\"{}\"", kw))
                .collect(),
            Strategy::Author => PROLIFIC_AUTHORS
                .iter()
                .map(|name| format!("author:\"{}\"", name))
                .collect(),
            Strategy::Franchise => FRANCHISES
                .iter()
                .flat_map(|(name, aliases)| std::iter::once(name).chain(aliases.iter()))
                .map(|title| format!("title:\"{}\"", title))
                .collect(),
            Strategy::Publisher => SERIES_PUBLISHERS
                .iter()
                .map(|name| format!("publisher:\"{}\" AND (series OR volume)", name))
                .collect(),
            Strategy::Language => LANGUAGE_TERMS
                .iter()
                .flat_map(|(code, terms)| {
                    terms
                        .iter()
                        .map(move |term| format!("language:{} AND \"{}\"", code, term))
                })
                .collect(),
            Strategy::Decade => {
                let (start, end) = (self.config.decade_start, self.config.decade_end);
                (start..=end)
                    .map(|year| format!("first_publish_year:{} AND (series OR saga)", year))
                    .collect()
            }
            Strategy::Genre => GENRES
                .iter()
                .map(|genre| format!("subject:\"{}\"", genre))
                .collect(),
            Strategy::Ordinal => {
                let max = self.config.ordinal_max;
                let mut queries = Vec::new();
                for prefix in ORDINAL_PREFIXES {
                    for letter in 'a'..='z' {
                        for n in 1..=max {
                            queries.push(format!("{} {} {}", prefix, letter, n));
                        }
                    }
                }
                queries
            }
            Strategy::Numeric => {
                let max = self.config.numeric_max;
                let mut queries = Vec::new();
                for n in 1..=max {
                    for prefix in NUMERIC_PREFIXES {
                        queries.push(format!("\"{} {}\"", prefix, n));
                    }
                }
                queries
            }
        }
    }
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Add query if not already seen (case-insensitive).
fn add_query(queries: &mut Vec<String>, seen: &mut HashSet<String>, query: String) {
    let normalized = query.trim().to_lowercase();
    if !normalized.is_empty() && seen.insert(normalized) {
        queries.push(query);
    }
}
