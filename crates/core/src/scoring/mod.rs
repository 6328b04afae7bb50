//! Confidence scoring, categorization and the validity gate.

mod category;
mod signals;

pub use category::categorize;
pub use signals::{detect, Signal};

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::aggregate::CandidateGroup;
use crate::parser::is_valid_name;
use crate::planner::Strategy;
use crate::registry::Category;

/// Scoring configuration (`[scoring]` section).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Per-strategy base confidence, keyed by strategy name.
    #[serde(default)]
    pub base: BTreeMap<String, u8>,
}

impl ScoringConfig {
    /// Effective base confidence for a strategy.
    pub fn base_for(&self, strategy: Strategy) -> u8 {
        self.base
            .get(strategy.as_str())
            .copied()
            .unwrap_or_else(|| strategy.default_base_score())
    }
}

/// Result of scoring one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    /// Clamped to 0..=100.
    pub confidence: u8,
    pub category: Category,
    pub signals: Vec<Signal>,
}

/// Scores and gates candidate groups for one session.
#[derive(Debug, Clone)]
pub struct Scorer {
    base: u8,
    accept_threshold: u32,
    high_singleton_threshold: u32,
    current_year: i32,
}

impl Scorer {
    pub fn new(base: u8, accept_threshold: u32, high_singleton_threshold: u32) -> Self {
        Self {
            base,
            accept_threshold,
            high_singleton_threshold,
            current_year: chrono::Utc::now().year(),
        }
    }

    /// Pin the year used for the plausible-year signal.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn base(&self) -> u8 {
        self.base
    }

    /// Confidence and category for a group.
    pub fn score(&self, group: &CandidateGroup) -> ScoreCard {
        let signals = detect(group, self.current_year);
        let total: i32 = i32::from(self.base) + signals.iter().map(Signal::weight).sum::<i32>();

        ScoreCard {
            confidence: total.clamp(0, 100) as u8,
            category: categorize(group),
            signals,
        }
    }

    /// Whether a scored group may be persisted.
    ///
    /// Requires the acceptance threshold plus either two volumes, two
    /// records, or a confidence at the high-singleton threshold.
    pub fn validate(&self, group: &CandidateGroup, confidence: u8) -> bool {
        let confidence = u32::from(confidence);
        if confidence < self.accept_threshold {
            return false;
        }
        if !is_valid_name(&group.display_name) {
            return false;
        }
        group.volume_set.len() >= 2
            || group.record_count() >= 2
            || confidence >= self.high_singleton_threshold
    }
}

/// Whether `value` names one of `known` (case-insensitive, allowing a
/// trailing suffix such as "Tor Books" for "tor").
pub(crate) fn matches_name(value: &str, known: &[&str]) -> bool {
    let value = value.trim().to_lowercase();
    known.iter().any(|k| {
        let k = k.to_lowercase();
        value == k || value.starts_with(&format!("{} ", k))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Aggregator, SeriesCandidate};
    use crate::catalog::CatalogRecord;
    use crate::parser::parse_title;

    fn group_of(records: &[CatalogRecord]) -> CandidateGroup {
        let mut agg = Aggregator::new();
        for r in records {
            agg.ingest(SeriesCandidate::new(parse_title(&r.title).unwrap(), r));
        }
        agg.into_groups().remove(0)
    }

    fn foo_saga(n: u32) -> CatalogRecord {
        let mut r = CatalogRecord::new(format!("The Foo Saga Volume {}", n));
        r.key = format!("/works/OL{}W", n);
        r.author_names.push("Jane Roe".to_string());
        r.subjects.insert("fiction".to_string());
        r.subjects.insert("fantasy".to_string());
        r
    }

    fn scorer() -> Scorer {
        Scorer::new(60, 70, 90).with_current_year(2026)
    }

    #[test]
    fn test_multi_volume_group_scores_high() {
        let group = group_of(&[foo_saga(1), foo_saga(2), foo_saga(3)]);
        let card = scorer().score(&group);
        assert_eq!(card.confidence, 100);
        assert_eq!(card.category, Category::Prose);
        assert!(scorer().validate(&group, card.confidence));
    }

    #[test]
    fn test_confidence_is_clamped() {
        let group = group_of(&[foo_saga(1), foo_saga(2)]);
        assert_eq!(Scorer::new(100, 70, 90).score(&group).confidence, 100);

        let mut r = CatalogRecord::new("Zyx: Proceedings of the Symposium");
        r.subjects.insert("congresses".to_string());
        let group = group_of(&[r]);
        assert_eq!(Scorer::new(10, 70, 90).score(&group).confidence, 0);
    }

    #[test]
    fn test_manga_singleton_passes_high_singleton_gate() {
        let mut r = CatalogRecord::new("Bar no Bouken Vol. 7");
        r.author_names.push("Taro Yamada".to_string());
        r.publishers.insert("Shueisha".to_string());
        r.subjects.insert("manga".to_string());
        r.subjects.insert("shonen".to_string());
        let group = group_of(&[r]);

        let card = scorer().score(&group);
        assert_eq!(card.category, Category::Manga);
        assert_eq!(card.confidence, 95);
        assert!(scorer().validate(&group, card.confidence));
    }

    #[test]
    fn test_singleton_below_high_threshold_is_rejected() {
        let mut r = CatalogRecord::new("Foo Quest (4)");
        r.author_names.push("Jane Roe".to_string());
        let group = group_of(&[r]);

        let card = scorer().score(&group);
        assert!(card.confidence >= 70 && card.confidence < 90);
        assert!(!scorer().validate(&group, card.confidence));
    }

    #[test]
    fn test_high_singleton_escape_can_be_disabled() {
        let mut r = CatalogRecord::new("Bar no Bouken Vol. 7");
        r.author_names.push("Taro Yamada".to_string());
        r.publishers.insert("Shueisha".to_string());
        r.subjects.insert("manga".to_string());
        let group = group_of(&[r]);

        let strict = Scorer::new(60, 70, 101).with_current_year(2026);
        let card = strict.score(&group);
        assert!(!strict.validate(&group, card.confidence));
    }

    #[test]
    fn test_low_confidence_is_rejected() {
        let group = group_of(&[foo_saga(1), foo_saga(2)]);
        assert!(!scorer().validate(&group, 69));
        assert!(scorer().validate(&group, 70));
    }

    #[test]
    fn test_base_for_strategy() {
        let mut config = ScoringConfig::default();
        assert_eq!(config.base_for(Strategy::Franchise), 70);
        config.base.insert("franchise".to_string(), 55);
        assert_eq!(config.base_for(Strategy::Franchise), 55);
        assert_eq!(config.base_for(Strategy::Ordinal), 50);
    }

    #[test]
    fn test_matches_name() {
        assert!(matches_name("Tor Books", &["tor"]));
        assert!(matches_name("  DEL REY ", &["Del Rey"]));
        assert!(!matches_name("Torchwood Press", &["tor"]));
    }
}
