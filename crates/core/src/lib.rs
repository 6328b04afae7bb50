pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod dedup;
pub mod harvest;
pub mod metrics;
pub mod parser;
pub mod planner;
pub mod registry;
pub mod scoring;
pub mod testing;

pub use aggregate::{Aggregator, CandidateGroup, SeriesCandidate};
pub use catalog::{
    Catalog, CatalogError, CatalogRecord, CatalogStats, OpenLibraryClient, OpenLibraryConfig,
    WorkDetail,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, RegistryConfig,
};
pub use dedup::{DedupOutcome, Deduplicator};
pub use harvest::{HarvestConfig, HarvestDriver, HarvestError, HarvestReport, SessionState};
pub use parser::{parse_title, ParsedTitle, PatternTier, VolumeHint};
pub use planner::{PlannerConfig, QueryPlanner, Strategy};
pub use registry::{Category, JsonRegistryStore, Registry, RegistryError, SeriesEntry};
pub use scoring::{ScoreCard, Scorer, ScoringConfig};
