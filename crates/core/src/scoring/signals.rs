//! Confidence signals and their weights.

use serde::Serialize;

use super::matches_name;
use crate::aggregate::CandidateGroup;
use crate::planner::vocab::SERIES_PUBLISHERS;

/// Volumes up to this number count as "small".
pub const SMALL_VOLUME_MAX: u32 = 20;

/// Earliest publication year treated as plausible.
pub const EARLIEST_PLAUSIBLE_YEAR: i32 = 1800;

/// Large trade publishers, in addition to the series publishers the
/// planner queries.
const MAJOR_PUBLISHERS: &[&str] = &[
    "penguin",
    "random house",
    "penguin random house",
    "simon & schuster",
    "simon and schuster",
    "macmillan",
    "hachette",
    "little, brown",
    "st. martin's",
    "doubleday",
    "knopf",
    "viking",
    "putnam",
    "berkley",
    "avon",
    "ballantine",
    "signet",
    "harper",
    "gallimard",
    "flammarion",
    "hodder",
    "bloomsbury",
    "kadokawa",
];

/// Subject fragments that corroborate a fiction series.
const FICTION_SUBJECTS: &[&str] = &[
    "fiction",
    "fantasy",
    "science fiction",
    "mystery",
    "detective",
    "thriller",
    "romance",
    "horror",
    "adventure",
    "juvenile",
    "young adult",
    "manga",
    "comic",
    "graphic novel",
    "light novel",
    "bande dessinée",
];

/// Subject fragments that mark academic or serial publications.
const ACADEMIC_SUBJECTS: &[&str] = &[
    "journal",
    "proceedings",
    "thesis",
    "dissertation",
    "congresses",
    "periodicals",
];

/// Words in a source title that suggest it belongs to a series.
const TITLE_SERIES_WORDS: &[&str] = &[
    "volume",
    "vol.",
    "book",
    "tome",
    "tomo",
    "band",
    "part",
    "#",
    "series",
    "saga",
    "chronicles",
    "trilogy",
    "quartet",
    "cycle",
    "巻",
];

/// Names this short are weak evidence.
const SHORT_NAME_MAX_CHARS: usize = 3;

/// One piece of evidence about a candidate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    SmallVolumes,
    LargeVolumes,
    MultipleVolumes,
    FinalVolume,
    AuthorPresent,
    IsbnPresent,
    PlausibleYear,
    SeriesKeyword,
    MultipleRecords,
    MajorPublisher,
    FictionSubject,
    AcademicSubject,
    ShortName,
}

impl Signal {
    /// Score adjustment for this signal.
    pub fn weight(&self) -> i32 {
        match self {
            Signal::SmallVolumes => 15,
            Signal::LargeVolumes => 10,
            Signal::MultipleVolumes => 10,
            Signal::FinalVolume => 5,
            Signal::AuthorPresent => 5,
            Signal::IsbnPresent => 5,
            Signal::PlausibleYear => 5,
            Signal::SeriesKeyword => 5,
            Signal::MultipleRecords => 10,
            Signal::MajorPublisher => 5,
            Signal::FictionSubject => 5,
            Signal::AcademicSubject => -20,
            Signal::ShortName => -10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::SmallVolumes => "small_volumes",
            Signal::LargeVolumes => "large_volumes",
            Signal::MultipleVolumes => "multiple_volumes",
            Signal::FinalVolume => "final_volume",
            Signal::AuthorPresent => "author_present",
            Signal::IsbnPresent => "isbn_present",
            Signal::PlausibleYear => "plausible_year",
            Signal::SeriesKeyword => "series_keyword",
            Signal::MultipleRecords => "multiple_records",
            Signal::MajorPublisher => "major_publisher",
            Signal::FictionSubject => "fiction_subject",
            Signal::AcademicSubject => "academic_subject",
            Signal::ShortName => "short_name",
        }
    }
}

/// Collect the signals a group exhibits.
pub fn detect(group: &CandidateGroup, current_year: i32) -> Vec<Signal> {
    let mut signals = Vec::new();

    if group.volume_set.iter().any(|v| *v <= SMALL_VOLUME_MAX) {
        signals.push(Signal::SmallVolumes);
    } else if !group.volume_set.is_empty() {
        signals.push(Signal::LargeVolumes);
    }
    if group.volume_set.len() >= 2 {
        signals.push(Signal::MultipleVolumes);
    }
    if group.final_seen {
        signals.push(Signal::FinalVolume);
    }

    if !group.authors.is_empty() {
        signals.push(Signal::AuthorPresent);
    }
    if group.has_isbn() {
        signals.push(Signal::IsbnPresent);
    }
    if group
        .year_set
        .iter()
        .any(|y| (EARLIEST_PLAUSIBLE_YEAR..=current_year + 1).contains(y))
    {
        signals.push(Signal::PlausibleYear);
    }
    if group.member_records.iter().any(|r| has_series_word(&r.title)) {
        signals.push(Signal::SeriesKeyword);
    }
    if group.record_count() >= 2 {
        signals.push(Signal::MultipleRecords);
    }
    if group.publisher_set().any(|p| {
        matches_name(p, MAJOR_PUBLISHERS) || matches_name(p, SERIES_PUBLISHERS)
    }) {
        signals.push(Signal::MajorPublisher);
    }
    if subject_matches(group, FICTION_SUBJECTS) {
        signals.push(Signal::FictionSubject);
    }

    if subject_matches(group, ACADEMIC_SUBJECTS) {
        signals.push(Signal::AcademicSubject);
    }
    if group.display_name.chars().count() <= SHORT_NAME_MAX_CHARS {
        signals.push(Signal::ShortName);
    }

    signals
}

/// Whether any (lowercased) subject of the group contains one of `fragments`.
pub(crate) fn subject_matches(group: &CandidateGroup, fragments: &[&str]) -> bool {
    group
        .subject_counts
        .keys()
        .any(|s| fragments.iter().any(|f| s.contains(f)))
}

fn has_series_word(title: &str) -> bool {
    let lower = title.to_lowercase();
    lower
        .split(|c: char| c.is_whitespace() || c == ',' || c == ':' || c == '(' || c == ')')
        .any(|word| TITLE_SERIES_WORDS.contains(&word))
        || lower.contains('#')
        || lower.contains('巻')
}
