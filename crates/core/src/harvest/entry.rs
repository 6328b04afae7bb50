//! Building registry entries from accepted groups.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::aggregate::CandidateGroup;
use crate::planner::Strategy;
use crate::registry::{SeriesEntry, SeriesMetadata};
use crate::scoring::ScoreCard;

/// Terms that mark derivative works rather than series volumes.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "summary",
    "study guide",
    "coloring book",
    "companion",
    "sparknotes",
    "cliffsnotes",
    "workbook",
];

const KEYWORD_STOP_WORDS: &[&str] = &[
    "the", "and", "les", "des", "der", "die", "das", "von", "del", "los", "las", "for", "with",
    "from",
];

const MAX_METADATA_SUBJECTS: usize = 5;

/// Best estimate of the number of volumes.
///
/// The highest volume seen when any were numbered, otherwise the number of
/// member records; never below 1.
pub fn estimate_volumes(group: &CandidateGroup) -> u32 {
    let estimate = match group.volume_set.iter().next_back() {
        Some(&max) => max.max(group.volume_set.len() as u32),
        None => group.record_count() as u32,
    };
    estimate.max(1)
}

/// Lowercased full name followed by its significant tokens.
pub fn build_keywords(name: &str) -> Vec<String> {
    let full = name.trim().to_lowercase();
    let mut keywords = vec![full.clone()];

    for token in full.split(|c: char| !c.is_alphanumeric()) {
        if token.chars().count() < 3 || KEYWORD_STOP_WORDS.contains(&token) {
            continue;
        }
        if !keywords.iter().any(|k| k == token) {
            keywords.push(token.to_string());
        }
    }
    keywords
}

/// Captured spellings that differ from the display name.
pub fn build_variations(group: &CandidateGroup) -> Vec<String> {
    let mut variations: Vec<String> = Vec::new();
    for raw in &group.raw_names {
        let raw = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if raw != group.display_name && !variations.contains(&raw) {
            variations.push(raw);
        }
    }
    variations
}

/// Descriptive metadata, or `None` when the group carried nothing useful.
pub fn build_metadata(group: &CandidateGroup) -> Option<SeriesMetadata> {
    let publisher = group
        .publisher_counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, _)| name.clone());

    let mut subjects: Vec<(&String, &usize)> = group.subject_counts.iter().collect();
    subjects.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let metadata = SeriesMetadata {
        publisher,
        language: group.languages.first().cloned(),
        subjects: subjects
            .into_iter()
            .take(MAX_METADATA_SUBJECTS)
            .map(|(s, _)| s.clone())
            .collect(),
        years: group.year_set.iter().copied().collect(),
    };

    if metadata.is_empty() {
        None
    } else {
        Some(metadata)
    }
}

/// Build the registry entry for an accepted group.
pub fn build_entry(
    group: &CandidateGroup,
    card: &ScoreCard,
    strategy: Strategy,
    detected_at: DateTime<Utc>,
) -> SeriesEntry {
    SeriesEntry {
        name: group.display_name.clone(),
        authors: group.authors.clone(),
        category: card.category,
        volumes: estimate_volumes(group),
        keywords: build_keywords(&group.display_name),
        variations: build_variations(group),
        exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
        source: strategy.as_str().to_string(),
        confidence_score: card.confidence.min(100),
        detection_date: detected_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        auto_generated: true,
        metadata: build_metadata(group),
    }
}
