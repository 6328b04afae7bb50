//! Types for harvest sessions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::planner::Strategy;
use crate::registry::RegistryError;

/// Errors that end a harvest session.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Registry could not be loaded, backed up or written.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Session stopped before it loaded anything.
    #[error("harvest aborted: {0}")]
    Aborted(String),
}

impl HarvestError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarvestError::Registry(_) => 1,
            HarvestError::Aborted(_) => 130,
        }
    }
}

/// Per-session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Init,
    Loading,
    Querying,
    Scoring,
    Persisting,
    Done,
    Aborted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Init => "init",
            SessionState::Loading => "loading",
            SessionState::Querying => "querying",
            SessionState::Scoring => "scoring",
            SessionState::Persisting => "persisting",
            SessionState::Done => "done",
            SessionState::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Done | SessionState::Aborted)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one harvest session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarvestReport {
    pub strategy: Strategy,
    pub elapsed_seconds: f64,
    /// Queries the planner produced.
    pub planned_queries: usize,
    /// Catalog searches made.
    pub queries_issued: u64,
    /// Records the catalog returned during this session.
    pub records_returned: u64,
    pub records_analyzed: u64,
    pub candidates_emitted: u64,
    pub groups_examined: usize,
    /// Groups that passed scoring and deduplication.
    pub accepted: usize,
    /// Entries actually written to the registry.
    pub written: usize,
    pub rejected_duplicates: usize,
    pub rejected_low_confidence: usize,
    /// Valid, new groups dropped because `max_accepted` was reached.
    pub skipped_over_limit: usize,
    pub cancelled: bool,
    pub dry_run: bool,
    pub accepted_names: Vec<String>,
    pub final_state: SessionState,
}

impl HarvestReport {
    pub fn new(strategy: Strategy, dry_run: bool) -> Self {
        Self {
            strategy,
            elapsed_seconds: 0.0,
            planned_queries: 0,
            queries_issued: 0,
            records_returned: 0,
            records_analyzed: 0,
            candidates_emitted: 0,
            groups_examined: 0,
            accepted: 0,
            written: 0,
            rejected_duplicates: 0,
            rejected_low_confidence: 0,
            skipped_over_limit: 0,
            cancelled: false,
            dry_run,
            accepted_names: Vec::new(),
            final_state: SessionState::Init,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let corrupt = HarvestError::from(RegistryError::Corrupt {
            path: PathBuf::from("series_registry.json"),
            reason: "expected value".to_string(),
        });
        assert_eq!(corrupt.exit_code(), 1);

        let backup = HarvestError::from(RegistryError::BackupFailed {
            path: PathBuf::from("backups"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(backup.exit_code(), 1);
        assert_eq!(HarvestError::Aborted("cancelled".into()).exit_code(), 130);
    }

    #[test]
    fn test_report_serialization() {
        let mut report = HarvestReport::new(Strategy::Keyword, true);
        report.final_state = SessionState::Done;
        report.accepted_names.push("Foo Saga".to_string());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["strategy"], "keyword");
        assert_eq!(json["final_state"], "done");
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["accepted_names"][0], "Foo Saga");
    }

    #[test]
    fn test_terminal_states() {
        assert!(SessionState::Done.is_terminal());
        assert!(SessionState::Aborted.is_terminal());
        assert!(!SessionState::Scoring.is_terminal());
    }
}
