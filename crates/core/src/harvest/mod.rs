//! Harvest sessions.
//!
//! A session runs one [`Strategy`](crate::planner::Strategy) through the
//! whole pipeline:
//! - **Loading**: read the registry and its name set
//! - **Querying**: one catalog request at a time, titles parsed and grouped
//! - **Scoring**: confidence, category, validity gate, deduplication
//! - **Persisting**: a single backed-up, atomic registry append

mod config;
mod driver;
pub mod entry;
mod types;

pub use config::HarvestConfig;
pub use driver::HarvestDriver;
pub use types::{HarvestError, HarvestReport, SessionState};
