//! Types for catalog search hits and work details.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Fields projected server-side on every search.
pub const DEFAULT_SEARCH_FIELDS: &[&str] = &[
    "key",
    "title",
    "author_name",
    "subject",
    "first_publish_year",
    "publisher",
    "language",
    "isbn",
];

/// One search hit from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogRecord {
    /// Catalog work key (e.g. "/works/OL123W"). May be empty.
    #[serde(default)]
    pub key: String,
    /// Title; never empty.
    pub title: String,
    /// Authors in catalog order.
    #[serde(default)]
    pub author_names: Vec<String>,
    #[serde(default)]
    pub subjects: BTreeSet<String>,
    #[serde(default)]
    pub publishers: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    /// 2-3 character language codes.
    #[serde(default)]
    pub language_codes: BTreeSet<String>,
    #[serde(default)]
    pub isbns: BTreeSet<String>,
}

impl CatalogRecord {
    /// Create a record with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            key: String::new(),
            title: title.into(),
            author_names: Vec::new(),
            subjects: BTreeSet::new(),
            publishers: BTreeSet::new(),
            first_publish_year: None,
            language_codes: BTreeSet::new(),
            isbns: BTreeSet::new(),
        }
    }

    /// First non-blank author name.
    pub fn primary_author(&self) -> Option<&str> {
        self.author_names
            .iter()
            .map(|a| a.trim())
            .find(|a| !a.is_empty())
    }

    pub fn has_isbn(&self) -> bool {
        !self.isbns.is_empty()
    }
}

/// Description field of a work, which the catalog sends either as a plain
/// string or as a typed text object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WorkDescription {
    Text(String),
    Typed {
        #[serde(default, rename = "type")]
        kind: Option<String>,
        value: String,
    },
}

impl WorkDescription {
    pub fn text(&self) -> &str {
        match self {
            WorkDescription::Text(s) => s,
            WorkDescription::Typed { value, .. } => value,
        }
    }
}

/// Work-level detail from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkDetail {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_date: Option<String>,
    #[serde(default)]
    pub covers: Vec<i64>,
}

/// Snapshot of client counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogStats {
    /// Search calls made by callers.
    pub queries_issued: u64,
    /// Records handed back to callers.
    pub records_returned: u64,
    /// HTTP requests sent, retries included.
    pub requests_sent: u64,
    /// Searches answered with HTTP 429.
    pub rate_limited: u64,
    /// Searches that degraded to an empty result for any other reason.
    pub failed_queries: u64,
}

/// Lock-free counters behind [`CatalogStats`].
#[derive(Debug, Default)]
pub struct StatsCounter {
    queries_issued: AtomicU64,
    records_returned: AtomicU64,
    requests_sent: AtomicU64,
    rate_limited: AtomicU64,
    failed_queries: AtomicU64,
}

impl StatsCounter {
    pub fn query_issued(&self) {
        self.queries_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn records_returned(&self, count: usize) {
        self.records_returned
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn request_sent(&self) {
        self.requests_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failed(&self) {
        self.failed_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CatalogStats {
        CatalogStats {
            queries_issued: self.queries_issued.load(Ordering::Relaxed),
            records_returned: self.records_returned.load(Ordering::Relaxed),
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
        }
    }
}
