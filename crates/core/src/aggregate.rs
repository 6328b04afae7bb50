//! Candidate aggregation.
//!
//! Parser hits are grouped by `(name, primary author)`, both lowercased.
//! Each group accumulates the evidence the scorer later reads.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::catalog::CatalogRecord;
use crate::parser::{ParsedTitle, VolumeHint};

/// Author key used when a record has no author.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// A parser hit paired with the record it came from.
#[derive(Debug, Clone)]
pub struct SeriesCandidate<'a> {
    pub parsed: ParsedTitle,
    pub record: &'a CatalogRecord,
}

impl<'a> SeriesCandidate<'a> {
    pub fn new(parsed: ParsedTitle, record: &'a CatalogRecord) -> Self {
        Self { parsed, record }
    }
}

/// Grouping key: lowercased name and primary author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub name: String,
    pub author: String,
}

impl GroupKey {
    pub fn for_candidate(candidate: &SeriesCandidate<'_>) -> Self {
        Self {
            name: candidate.parsed.name.to_lowercase(),
            author: candidate
                .record
                .primary_author()
                .map(|a| a.trim().to_lowercase())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        }
    }
}

/// Evidence accumulated for one suspected series.
#[derive(Debug, Clone)]
pub struct CandidateGroup {
    pub key: GroupKey,
    /// Normalized name as first seen (case preserved).
    pub display_name: String,
    /// Distinct captured names before normalization, in arrival order.
    pub raw_names: Vec<String>,
    /// Distinct author names across members, in arrival order.
    pub authors: Vec<String>,
    pub member_records: Vec<CatalogRecord>,
    /// Positive volume numbers seen.
    pub volume_set: BTreeSet<u32>,
    /// Some member announced itself as the last volume.
    pub final_seen: bool,
    /// Lowercased subject counts across members.
    pub subject_counts: BTreeMap<String, usize>,
    /// Publisher counts across members (case preserved).
    pub publisher_counts: BTreeMap<String, usize>,
    pub year_set: BTreeSet<i32>,
    /// Distinct language codes, in arrival order.
    pub languages: Vec<String>,
    pub pattern_ids_seen: BTreeSet<u8>,
}

impl CandidateGroup {
    fn new(key: GroupKey, display_name: String) -> Self {
        Self {
            key,
            display_name,
            raw_names: Vec::new(),
            authors: Vec::new(),
            member_records: Vec::new(),
            volume_set: BTreeSet::new(),
            final_seen: false,
            subject_counts: BTreeMap::new(),
            publisher_counts: BTreeMap::new(),
            year_set: BTreeSet::new(),
            languages: Vec::new(),
            pattern_ids_seen: BTreeSet::new(),
        }
    }

    /// Number of member records.
    pub fn record_count(&self) -> usize {
        self.member_records.len()
    }

    /// Distinct publishers seen.
    pub fn publisher_set(&self) -> impl Iterator<Item = &str> {
        self.publisher_counts.keys().map(String::as_str)
    }

    pub fn has_subject(&self, subject: &str) -> bool {
        self.subject_counts.contains_key(subject)
    }

    /// Whether any member carries an ISBN.
    pub fn has_isbn(&self) -> bool {
        self.member_records.iter().any(|r| r.has_isbn())
    }

    /// Whether this record is already a member (by non-empty catalog key).
    fn contains_record(&self, record: &CatalogRecord) -> bool {
        !record.key.is_empty() && self.member_records.iter().any(|r| r.key == record.key)
    }

    fn absorb(&mut self, candidate: SeriesCandidate<'_>) {
        let SeriesCandidate { parsed, record } = candidate;

        if !self.raw_names.iter().any(|n| n == &parsed.raw_name) {
            self.raw_names.push(parsed.raw_name);
        }

        for author in &record.author_names {
            let author = author.trim();
            if author.is_empty() {
                continue;
            }
            if !self.authors.iter().any(|a| a.eq_ignore_ascii_case(author)) {
                self.authors.push(author.to_string());
            }
        }

        match parsed.volume {
            Some(VolumeHint::Number(n)) if n > 0 => {
                self.volume_set.insert(n);
            }
            Some(VolumeHint::Final) => self.final_seen = true,
            _ => {}
        }

        for subject in &record.subjects {
            let subject = subject.trim().to_lowercase();
            if !subject.is_empty() {
                *self.subject_counts.entry(subject).or_insert(0) += 1;
            }
        }
        for publisher in &record.publishers {
            let publisher = publisher.trim();
            if !publisher.is_empty() {
                *self
                    .publisher_counts
                    .entry(publisher.to_string())
                    .or_insert(0) += 1;
            }
        }
        if let Some(year) = record.first_publish_year {
            self.year_set.insert(year);
        }
        for code in &record.language_codes {
            if !self.languages.contains(code) {
                self.languages.push(code.clone());
            }
        }
        self.pattern_ids_seen.insert(parsed.pattern_id);

        self.member_records.push(record.clone());
    }
}

/// Groups candidates for one harvest session.
///
/// Groups are kept in first-seen order so that scoring and persistence
/// follow the order in which records arrived.
#[derive(Debug, Default)]
pub struct Aggregator {
    groups: Vec<CandidateGroup>,
    index: HashMap<GroupKey, usize>,
    ingested: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate to its group, creating the group on first sight.
    ///
    /// A record whose catalog key is already a member of the group is
    /// ignored, so the same work returned by two queries counts once.
    /// Returns whether the candidate was absorbed.
    pub fn ingest(&mut self, candidate: SeriesCandidate<'_>) -> bool {
        let key = GroupKey::for_candidate(&candidate);

        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = self.groups.len();
                self.groups.push(CandidateGroup::new(
                    key.clone(),
                    candidate.parsed.name.clone(),
                ));
                self.index.insert(key, idx);
                idx
            }
        };

        let group = &mut self.groups[idx];
        if group.contains_record(candidate.record) {
            return false;
        }
        group.absorb(candidate);
        self.ingested += 1;
        true
    }

    pub fn groups(&self) -> &[CandidateGroup] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<CandidateGroup> {
        self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Candidates absorbed so far.
    pub fn ingested(&self) -> usize {
        self.ingested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_title;

    fn record(key: &str, title: &str, author: Option<&str>) -> CatalogRecord {
        let mut r = CatalogRecord::new(title);
        r.key = key.to_string();
        if let Some(a) = author {
            r.author_names.push(a.to_string());
        }
        r
    }

    fn ingest(agg: &mut Aggregator, r: &CatalogRecord) -> bool {
        let parsed = parse_title(&r.title).unwrap();
        agg.ingest(SeriesCandidate::new(parsed, r))
    }

    #[test]
    fn test_groups_by_name_and_author() {
        let mut agg = Aggregator::new();
        let records = [
            record("/works/1", "The Foo Saga Volume 1", Some("Jane Roe")),
            record("/works/2", "Foo Saga, Book 2", Some("jane roe")),
            record("/works/3", "Foo Saga Volume 3", Some("John Doe")),
        ];
        for r in &records {
            assert!(ingest(&mut agg, r));
        }

        assert_eq!(agg.len(), 2);
        let first = &agg.groups()[0];
        assert_eq!(first.key.name, "foo saga");
        assert_eq!(first.key.author, "jane roe");
        assert_eq!(first.display_name, "Foo Saga");
        assert_eq!(first.record_count(), 2);
        assert_eq!(first.volume_set.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(first.raw_names, vec!["The Foo Saga", "Foo Saga"]);
        assert_eq!(first.authors, vec!["Jane Roe"]);
        assert_eq!(agg.ingested(), 3);
    }

    #[test]
    fn test_missing_author_uses_sentinel() {
        let mut agg = Aggregator::new();
        let r = record("", "Foo Saga Volume 1", None);
        ingest(&mut agg, &r);
        assert_eq!(agg.groups()[0].key.author, UNKNOWN_AUTHOR);
        assert!(agg.groups()[0].authors.is_empty());
    }

    #[test]
    fn test_same_record_counts_once() {
        let mut agg = Aggregator::new();
        let r = record("/works/1", "Foo Saga Volume 1", Some("Jane Roe"));
        assert!(ingest(&mut agg, &r));
        assert!(!ingest(&mut agg, &r));
        assert_eq!(agg.groups()[0].record_count(), 1);
        assert_eq!(agg.ingested(), 1);

        // Records without keys cannot be told apart.
        let keyless = record("", "Foo Saga Volume 2", Some("Jane Roe"));
        assert!(ingest(&mut agg, &keyless));
        assert!(ingest(&mut agg, &keyless));
        assert_eq!(agg.groups()[0].record_count(), 3);
    }

    #[test]
    fn test_accumulates_record_evidence() {
        let mut agg = Aggregator::new();
        let mut a = record("/works/1", "Foo Saga Volume 1", Some("Jane Roe"));
        a.subjects.insert("Fiction".to_string());
        a.subjects.insert("Fantasy".to_string());
        a.publishers.insert("Tor".to_string());
        a.first_publish_year = Some(2001);
        a.language_codes.insert("eng".to_string());
        let mut b = record("/works/2", "Foo Saga: The Final Volume", Some("Jane Roe"));
        b.subjects.insert("fiction".to_string());
        b.publishers.insert("Tor".to_string());
        b.first_publish_year = Some(2004);
        b.isbns.insert("9780000000001".to_string());

        ingest(&mut agg, &a);
        ingest(&mut agg, &b);

        let group = &agg.groups()[0];
        assert_eq!(group.subject_counts.get("fiction"), Some(&2));
        assert_eq!(group.subject_counts.get("fantasy"), Some(&1));
        assert_eq!(group.publisher_counts.get("Tor"), Some(&2));
        assert_eq!(group.publisher_set().collect::<Vec<_>>(), vec!["Tor"]);
        assert_eq!(group.year_set.len(), 2);
        assert_eq!(group.languages, vec!["eng"]);
        assert!(group.final_seen);
        assert_eq!(group.volume_set.len(), 1);
        assert!(group.has_isbn());
        assert_eq!(group.pattern_ids_seen.len(), 2);
    }

    #[test]
    fn test_volume_zero_stays_out_of_volume_set() {
        let mut agg = Aggregator::new();
        let r = record("/works/1", "Foo Saga Volume 0", Some("Jane Roe"));
        ingest(&mut agg, &r);
        assert!(agg.groups()[0].volume_set.is_empty());
        assert_eq!(agg.groups()[0].record_count(), 1);
    }
}
