//! Open Library search client.
//!
//! Open Library asks API users to:
//! - send a User-Agent identifying the application
//! - keep request rates low (we pace every request with a random delay)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::metrics::{CATALOG_REQUESTS, CATALOG_RECORDS};

use super::pacing::Pacer;
use super::types::{CatalogRecord, CatalogStats, StatsCounter, WorkDescription, WorkDetail};
use super::{Catalog, CatalogError};

/// Open Library client configuration (`[catalog]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenLibraryConfig {
    /// Base URL (default: https://openlibrary.org).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User-Agent sent on every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Lower bound of the pre-request sleep.
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,
    /// Upper bound of the pre-request sleep.
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    /// Sleep after a 429 before moving on.
    #[serde(default = "default_backoff")]
    pub backoff_ms: u64,
    /// Retries for timeouts and connection failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Docs requested per search.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

fn default_base_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_user_agent() -> String {
    format!(
        "SeriesDex/{} (book series registry harvester)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_timeout() -> u64 {
    30
}

fn default_min_delay() -> u64 {
    200
}

fn default_max_delay() -> u64 {
    800
}

fn default_backoff() -> u64 {
    2000
}

fn default_max_retries() -> u32 {
    1
}

fn default_page_limit() -> u32 {
    100
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
            backoff_ms: default_backoff(),
            max_retries: default_max_retries(),
            page_limit: default_page_limit(),
        }
    }
}

/// Open Library API client.
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
    pacer: Pacer,
    backoff: Duration,
    max_retries: u32,
    stats: StatsCounter,
}

impl OpenLibraryClient {
    /// Create a new client.
    pub fn new(config: OpenLibraryConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pacer: Pacer::from_millis(config.min_delay_ms, config.max_delay_ms),
            backoff: Duration::from_millis(config.backoff_ms),
            max_retries: config.max_retries,
            stats: StatsCounter::default(),
        })
    }

    /// One paced HTTP search, no error absorption.
    async fn try_search(
        &self,
        query: &str,
        limit: u32,
        fields: &[&str],
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.pacer.wait().await;
        self.stats.request_sent();

        let url = build_search_url(&self.base_url, query, limit, fields);
        debug!(query, limit, "Catalog search");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == 429 {
            return Err(CatalogError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Http {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| CatalogError::Decode(format!("Failed to parse search response: {}", e)))?;

        debug!(query, num_found = parsed.num_found, "Catalog search answered");

        Ok(records_from_docs(parsed.docs))
    }
}

#[async_trait]
impl Catalog for OpenLibraryClient {
    async fn search(&self, query: &str, limit: u32, fields: &[&str]) -> Vec<CatalogRecord> {
        self.stats.query_issued();
        let mut attempt = 0;

        loop {
            match self.try_search(query, limit, fields).await {
                Ok(records) => {
                    CATALOG_REQUESTS.with_label_values(&["ok"]).inc();
                    CATALOG_RECORDS.inc_by(records.len() as u64);
                    self.stats.records_returned(records.len());
                    return records;
                }
                Err(CatalogError::RateLimited) => {
                    CATALOG_REQUESTS.with_label_values(&["rate_limited"]).inc();
                    self.stats.rate_limited();
                    warn!(
                        query,
                        backoff_ms = self.backoff.as_millis() as u64,
                        "Catalog rate limit exceeded, backing off"
                    );
                    sleep(self.backoff).await;
                    return Vec::new();
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    CATALOG_REQUESTS.with_label_values(&[e.outcome()]).inc();
                    attempt += 1;
                    warn!(query, attempt, error = %e, "Catalog request failed, retrying");
                }
                Err(e) => {
                    CATALOG_REQUESTS.with_label_values(&[e.outcome()]).inc();
                    self.stats.failed();
                    warn!(query, error = %e, "Catalog search failed, treating as no hits");
                    return Vec::new();
                }
            }
        }
    }

    async fn work(&self, key: &str) -> Result<Option<WorkDetail>, CatalogError> {
        let id = work_id(key);
        if id.is_empty() {
            return Ok(None);
        }

        self.pacer.wait().await;
        self.stats.request_sent();

        let url = format!("{}/works/{}.json", self.base_url, urlencoding::encode(id));
        debug!(work = id, "Catalog work lookup");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == 404 {
            return Ok(None);
        }
        if status == 429 {
            warn!(work = id, "Catalog rate limit exceeded");
            return Err(CatalogError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Http {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let doc: WorkDoc = response.json().await.map_err(|e| {
            CatalogError::Decode(format!("Failed to parse work response: {}", e))
        })?;

        Ok(Some(doc.into_detail(id)))
    }

    fn stats(&self) -> CatalogStats {
        self.stats.snapshot()
    }
}

/// Build the search URL with server-side field projection.
fn build_search_url(base_url: &str, query: &str, limit: u32, fields: &[&str]) -> String {
    let mut url = format!(
        "{}/search.json?q={}&limit={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(query),
        limit.clamp(1, 1000)
    );
    if !fields.is_empty() {
        url.push_str("&fields=");
        url.push_str(&urlencoding::encode(&fields.join(",")));
    }
    url
}

/// Strip a "/works/" prefix and ".json" suffix from a work key.
fn work_id(key: &str) -> &str {
    let key = key.trim();
    let key = key.strip_prefix("/works/").unwrap_or(key);
    let key = key.strip_prefix("works/").unwrap_or(key);
    key.strip_suffix(".json").unwrap_or(key)
}

/// Map raw docs to records. Undecodable rows are dropped with a warning,
/// rows without a title are dropped silently.
fn records_from_docs(docs: Vec<Value>) -> Vec<CatalogRecord> {
    let mut records = Vec::with_capacity(docs.len());
    for (index, doc) in docs.into_iter().enumerate() {
        match serde_json::from_value::<SearchDoc>(doc) {
            Ok(doc) => match doc.into_record() {
                Some(record) => records.push(record),
                None => debug!(index, "Skipping catalog row without title"),
            },
            Err(e) => warn!(index, error = %e, "Dropping malformed catalog row"),
        }
    }
    records
}

// ============================================================================
// Open Library API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "numFound", default)]
    num_found: u64,
    #[serde(default)]
    docs: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author_name: Option<Vec<String>>,
    #[serde(default)]
    subject: Option<Vec<String>>,
    #[serde(default)]
    publisher: Option<Vec<String>>,
    #[serde(default)]
    first_publish_year: Option<i32>,
    #[serde(default)]
    language: Option<Vec<String>>,
    #[serde(default)]
    isbn: Option<Vec<String>>,
}

impl SearchDoc {
    fn into_record(self) -> Option<CatalogRecord> {
        let title = self.title?.trim().to_string();
        if title.is_empty() {
            return None;
        }

        Some(CatalogRecord {
            key: self.key.unwrap_or_default(),
            title,
            author_names: clean_list(self.author_name).collect(),
            subjects: clean_list(self.subject).collect(),
            publishers: clean_list(self.publisher).collect(),
            first_publish_year: self.first_publish_year,
            language_codes: clean_list(self.language)
                .map(|l| l.to_lowercase())
                .filter(|l| (2..=3).contains(&l.chars().count()))
                .collect(),
            isbns: clean_list(self.isbn).collect(),
        })
    }
}

fn clean_list(values: Option<Vec<String>>) -> impl Iterator<Item = String> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct WorkDoc {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subjects: Option<Vec<String>>,
    #[serde(default)]
    description: Option<WorkDescription>,
    #[serde(default)]
    first_publish_date: Option<String>,
    #[serde(default)]
    covers: Option<Vec<i64>>,
}

impl WorkDoc {
    fn into_detail(self, id: &str) -> WorkDetail {
        WorkDetail {
            key: self.key.unwrap_or_else(|| format!("/works/{}", id)),
            title: self.title.unwrap_or_default(),
            subjects: self.subjects.unwrap_or_default(),
            description: self.description.map(|d| d.text().to_string()),
            first_publish_date: self.first_publish_date,
            covers: self.covers.unwrap_or_default(),
        }
    }
}
