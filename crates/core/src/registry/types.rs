//! Types persisted in the series registry file.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse classification of a series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Prose,
    Comics,
    Manga,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Prose, Category::Comics, Category::Manga];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Prose => "prose",
            Category::Comics => "comics",
            Category::Manga => "manga",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prose" => Ok(Category::Prose),
            "comics" => Ok(Category::Comics),
            "manga" => Ok(Category::Manga),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Optional descriptive metadata attached to a registry entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeriesMetadata {
    /// Most frequently seen publisher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Primary language code (as reported by the catalog).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Most frequent subjects, most common first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    /// Distinct first-publication years, ascending.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub years: Vec<i32>,
}

impl SeriesMetadata {
    pub fn is_empty(&self) -> bool {
        self.publisher.is_none()
            && self.language.is_none()
            && self.subjects.is_empty()
            && self.years.is_empty()
    }
}

/// A curated series record, as stored in the registry file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesEntry {
    /// Canonical display name (case preserved).
    pub name: String,
    /// Authors, primary first.
    #[serde(default)]
    pub authors: Vec<String>,
    pub category: Category,
    /// Best estimate of the number of volumes.
    pub volumes: u32,
    /// Short lowercase strings used by consumers for matching.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Alternate display spellings.
    #[serde(default)]
    pub variations: Vec<String>,
    /// Terms that mark a false-positive match at consumer time.
    #[serde(default)]
    pub exclusions: Vec<String>,
    /// Harvest strategy that produced the entry.
    pub source: String,
    pub confidence_score: u8,
    /// ISO-8601 timestamp.
    pub detection_date: String,
    #[serde(default)]
    pub auto_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SeriesMetadata>,
}

impl SeriesEntry {
    /// Lowercased name used for registry membership.
    pub fn name_key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// Check the schema rules that serde alone cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("empty name".to_string());
        }
        if self.confidence_score > 100 {
            return Err(format!(
                "confidence_score {} out of range",
                self.confidence_score
            ));
        }
        if self.volumes == 0 {
            return Err("volumes must be at least 1".to_string());
        }
        if self.source.trim().is_empty() {
            return Err("empty source".to_string());
        }
        Ok(())
    }
}

/// In-memory view of the registry for one session.
///
/// `preserved` holds the on-disk array exactly as read, including rows that
/// failed validation, so a rewrite never drops data it did not understand.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub entries: Vec<SeriesEntry>,
    pub names: HashSet<String>,
    pub skipped: usize,
    pub(crate) preserved: Vec<serde_json::Value>,
}

impl Registry {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive membership test on canonical names.
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(&name.trim().to_lowercase())
    }
}
