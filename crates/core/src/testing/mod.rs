//! Testing utilities and mock implementations.
//!
//! This module provides a mock [`Catalog`](crate::catalog::Catalog) so the
//! harvest pipeline can be exercised end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use seriesdex_core::testing::{fixtures, MockCatalog};
//!
//! let catalog = Arc::new(MockCatalog::new());
//! catalog.push_rate_limited().await;
//! catalog.push_records(fixtures::foo_saga_records()).await;
//!
//! let driver = HarvestDriver::new(catalog.clone(), store, HarvestConfig::default());
//! ```

mod mock_catalog;

pub use mock_catalog::{MockCatalog, MockResponse, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{CatalogRecord, WorkDetail};
    use crate::registry::{Category, SeriesEntry};

    /// Create a catalog record with one or more authors and subjects.
    pub fn record(key: &str, title: &str, authors: &[&str], subjects: &[&str]) -> CatalogRecord {
        let mut record = CatalogRecord::new(title);
        record.key = key.to_string();
        record.author_names = authors.iter().map(|a| a.to_string()).collect();
        record.subjects = subjects.iter().map(|s| s.to_string()).collect();
        record
    }

    /// Three volumes of "The Foo Saga" by Jane Roe.
    pub fn foo_saga_records() -> Vec<CatalogRecord> {
        (1..=3)
            .map(|i| {
                record(
                    &format!("/works/OL{}W", i),
                    &format!("The Foo Saga Volume {}", i),
                    &["Jane Roe"],
                    &["fiction", "fantasy"],
                )
            })
            .collect()
    }

    /// `count` numbered volumes of a series, titled "{name} Volume {i}".
    pub fn series_records(name: &str, author: &str, count: u32) -> Vec<CatalogRecord> {
        let slug: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase();
        (1..=count)
            .map(|i| {
                record(
                    &format!("/works/OL{}{}W", slug, i),
                    &format!("{} Volume {}", name, i),
                    &[author],
                    &["fiction"],
                )
            })
            .collect()
    }

    /// Volume 7 of a shonen manga from Shueisha.
    pub fn manga_record() -> CatalogRecord {
        let mut record = record(
            "/works/OL77W",
            "Bar no Bouken Vol. 7",
            &["Taro Yamada"],
            &["manga", "shonen"],
        );
        record.publishers.insert("Shueisha".to_string());
        record
    }

    /// A valid registry entry for seeding.
    pub fn entry(name: &str) -> SeriesEntry {
        SeriesEntry {
            name: name.to_string(),
            authors: vec!["Jane Roe".to_string()],
            category: Category::Prose,
            volumes: 3,
            keywords: vec![name.to_lowercase()],
            variations: vec![],
            exclusions: vec![],
            source: "manual".to_string(),
            confidence_score: 90,
            detection_date: "2024-01-01T00:00:00Z".to_string(),
            auto_generated: false,
            metadata: None,
        }
    }

    /// A work detail with no optional fields.
    pub fn work_detail(key: &str, title: &str) -> WorkDetail {
        WorkDetail {
            key: key.to_string(),
            title: title.to_string(),
            subjects: vec![],
            description: None,
            first_publish_date: None,
            covers: vec![],
        }
    }
}
