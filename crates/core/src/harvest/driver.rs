//! Harvest session driver.
//!
//! Runs one strategy end to end: plan queries, search the catalog one
//! request at a time, parse and aggregate titles, then score, gate,
//! deduplicate and append the survivors to the registry in one write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::aggregate::{Aggregator, SeriesCandidate};
use crate::catalog::{Catalog, DEFAULT_SEARCH_FIELDS};
use crate::dedup::{DedupOutcome, Deduplicator};
use crate::metrics;
use crate::parser::parse_title;
use crate::planner::{QueryPlanner, Strategy};
use crate::registry::{JsonRegistryStore, SeriesEntry};
use crate::scoring::{Scorer, ScoringConfig};

use super::config::HarvestConfig;
use super::entry::build_entry;
use super::types::{HarvestError, HarvestReport, SessionState};

/// Drives harvest sessions against one catalog and one registry file.
pub struct HarvestDriver {
    catalog: Arc<dyn Catalog>,
    store: JsonRegistryStore,
    planner: QueryPlanner,
    scoring: ScoringConfig,
    config: HarvestConfig,
    page_limit: u32,
    cancel: Arc<AtomicBool>,
}

impl HarvestDriver {
    /// Create a driver with default planner and scoring config.
    pub fn new(catalog: Arc<dyn Catalog>, store: JsonRegistryStore, config: HarvestConfig) -> Self {
        Self {
            catalog,
            store,
            planner: QueryPlanner::new(),
            scoring: ScoringConfig::default(),
            config,
            page_limit: 100,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_planner(mut self, planner: QueryPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Records requested per search.
    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Share an external cancellation flag.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle for requesting cancellation between queries.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub fn store(&self) -> &JsonRegistryStore {
        &self.store
    }

    /// Run every strategy in turn, each as its own session.
    ///
    /// Stops early, returning the reports so far, once cancellation has
    /// been requested.
    pub async fn run_all(&self) -> Result<Vec<HarvestReport>, HarvestError> {
        let mut reports = Vec::new();
        for strategy in Strategy::ALL {
            match self.run(strategy).await {
                Ok(report) => reports.push(report),
                Err(HarvestError::Aborted(reason)) => {
                    warn!(strategy = %strategy, %reason, "Stopping remaining strategies");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(reports)
    }

    /// Run one harvest session.
    ///
    /// Only registry failures (corrupt file, failed backup, failed write)
    /// are returned as errors. Catalog and parse failures are absorbed and
    /// show up in the report counters.
    pub async fn run(&self, strategy: Strategy) -> Result<HarvestReport, HarvestError> {
        let started = Instant::now();
        let timer = metrics::HARVEST_DURATION
            .with_label_values(&[strategy.as_str()])
            .start_timer();
        let mut report = HarvestReport::new(strategy, self.config.dry_run);
        let mut state = SessionState::Init;

        if self.is_cancelled() {
            return Err(HarvestError::Aborted(format!(
                "cancelled before {} session started",
                strategy
            )));
        }

        info!(
            strategy = %strategy,
            dry_run = self.config.dry_run,
            api_cap = ?self.config.api_cap,
            "Harvest session started"
        );

        // Loading
        transition(&mut state, SessionState::Loading);
        let mut registry = match self.store.load() {
            Ok(registry) => registry,
            Err(e) => {
                transition(&mut state, SessionState::Aborted);
                error!(strategy = %strategy, error = %e, "Failed to load registry");
                return Err(e.into());
            }
        };
        let mut dedup = Deduplicator::new(registry.names.clone());

        // Querying
        transition(&mut state, SessionState::Querying);
        let queries = self.planner.plan(strategy);
        report.planned_queries = queries.len();
        let stats_before = self.catalog.stats();
        let mut aggregator = Aggregator::new();

        for query in &queries {
            if self.is_cancelled() {
                info!(
                    queries_issued = report.queries_issued,
                    "Cancellation requested, scoring partial results"
                );
                report.cancelled = true;
                break;
            }
            if let Some(cap) = self.config.api_cap {
                if report.queries_issued >= cap {
                    info!(cap, "API cap reached, scoring partial results");
                    break;
                }
            }

            let records = self
                .catalog
                .search(query, self.page_limit, DEFAULT_SEARCH_FIELDS)
                .await;
            report.queries_issued += 1;
            info!(query = %query, records = records.len(), "Query complete");

            for record in &records {
                report.records_analyzed += 1;
                let Some(parsed) = parse_title(&record.title) else {
                    continue;
                };
                report.candidates_emitted += 1;
                metrics::CANDIDATES_EMITTED
                    .with_label_values(&[strategy.as_str()])
                    .inc();
                aggregator.ingest(SeriesCandidate::new(parsed, record));
            }
        }

        // Scoring
        transition(&mut state, SessionState::Scoring);
        let scorer = Scorer::new(
            self.scoring.base_for(strategy),
            self.config.accept_threshold,
            self.config.high_singleton_threshold,
        );
        let detected_at = Utc::now();
        let mut accepted: Vec<SeriesEntry> = Vec::new();

        for group in aggregator.groups() {
            report.groups_examined += 1;
            let card = scorer.score(group);

            if !scorer.validate(group, card.confidence) {
                debug!(
                    name = %group.display_name,
                    confidence = card.confidence,
                    records = group.record_count(),
                    volumes = group.volume_set.len(),
                    "Group rejected: low confidence"
                );
                report.rejected_low_confidence += 1;
                metrics::GROUPS_REJECTED
                    .with_label_values(&["low_confidence"])
                    .inc();
                continue;
            }

            match dedup.check(group) {
                DedupOutcome::Accepted => {}
                DedupOutcome::InvalidName => {
                    report.rejected_low_confidence += 1;
                    metrics::GROUPS_REJECTED
                        .with_label_values(&["low_confidence"])
                        .inc();
                    continue;
                }
                outcome @ (DedupOutcome::InRegistry | DedupOutcome::SeenInSession) => {
                    debug!(name = %group.display_name, ?outcome, "Group rejected: duplicate");
                    report.rejected_duplicates += 1;
                    metrics::GROUPS_REJECTED
                        .with_label_values(&["duplicate"])
                        .inc();
                    continue;
                }
            }

            if let Some(max) = self.config.max_accepted {
                if accepted.len() >= max {
                    report.skipped_over_limit += 1;
                    metrics::GROUPS_REJECTED
                        .with_label_values(&["over_limit"])
                        .inc();
                    continue;
                }
            }

            dedup.accept(group);
            let entry = build_entry(group, &card, strategy, detected_at);
            info!(
                name = %entry.name,
                confidence = entry.confidence_score,
                category = %entry.category,
                volumes = entry.volumes,
                "Series accepted"
            );
            metrics::SERIES_ACCEPTED
                .with_label_values(&[entry.category.as_str()])
                .inc();
            metrics::ACCEPTED_CONFIDENCE.observe(f64::from(entry.confidence_score));
            accepted.push(entry);
        }

        report.accepted = accepted.len();
        report.accepted_names = accepted.iter().map(|e| e.name.clone()).collect();

        // Persisting
        transition(&mut state, SessionState::Persisting);
        if self.config.dry_run {
            info!(accepted = report.accepted, "Dry run, registry not written");
        } else {
            match self
                .store
                .append_all(&mut registry, accepted, strategy.as_str())
            {
                Ok(written) => report.written = written,
                Err(e) => {
                    transition(&mut state, SessionState::Aborted);
                    error!(strategy = %strategy, error = %e, "Failed to persist registry");
                    return Err(e.into());
                }
            }
        }

        transition(&mut state, SessionState::Done);
        let stats_after = self.catalog.stats();
        report.records_returned = stats_after
            .records_returned
            .saturating_sub(stats_before.records_returned);
        report.elapsed_seconds = started.elapsed().as_secs_f64();
        report.final_state = state;
        timer.observe_duration();

        info!(
            strategy = %strategy,
            queries_issued = report.queries_issued,
            records_analyzed = report.records_analyzed,
            groups_examined = report.groups_examined,
            accepted = report.accepted,
            written = report.written,
            rejected_duplicates = report.rejected_duplicates,
            rejected_low_confidence = report.rejected_low_confidence,
            elapsed_seconds = report.elapsed_seconds,
            "Harvest session finished"
        );

        Ok(report)
    }
}

fn transition(state: &mut SessionState, next: SessionState) {
    debug!(from = %state, to = %next, "Session state change");
    *state = next;
}
