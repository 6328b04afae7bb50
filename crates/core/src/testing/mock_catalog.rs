//! Mock catalog for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::catalog::{Catalog, CatalogError, CatalogRecord, CatalogStats, StatsCounter, WorkDetail};

/// A scripted answer to one search.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// HTTP 200 with these records.
    Records(Vec<CatalogRecord>),
    /// HTTP 429: the mock sleeps its backoff and returns nothing.
    RateLimited,
    /// Any other transient failure: returns nothing.
    Failure,
}

/// A recorded search call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    pub query: String,
    pub limit: u32,
    pub at: Instant,
}

/// Mock implementation of the Catalog trait.
///
/// Provides controllable behavior for testing:
/// - Answer searches from a scripted queue, or per query string
/// - Simulate 429 responses, including the backoff sleep
/// - Track searches (with timestamps) for assertions
/// - Serve work details and fail work lookups on demand
///
/// Searches with nothing scripted return no records.
#[derive(Debug)]
pub struct MockCatalog {
    /// Responses consumed in order by searches without a per-query answer.
    script: Arc<RwLock<VecDeque<MockResponse>>>,
    /// Fixed answers by exact query string.
    by_query: Arc<RwLock<HashMap<String, MockResponse>>>,
    /// Work details by key.
    works: Arc<RwLock<HashMap<String, WorkDetail>>>,
    /// Recorded searches.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    /// If set, the next work lookup will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    backoff: Duration,
    stats: StatsCounter,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Create a new mock catalog with no scripted answers.
    pub fn new() -> Self {
        Self {
            script: Arc::new(RwLock::new(VecDeque::new())),
            by_query: Arc::new(RwLock::new(HashMap::new())),
            works: Arc::new(RwLock::new(HashMap::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            backoff: Duration::ZERO,
            stats: StatsCounter::default(),
        }
    }

    /// Sleep applied after a simulated 429.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    // =========================================================================
    // Search Configuration
    // =========================================================================

    /// Queue a scripted response.
    pub async fn push_response(&self, response: MockResponse) {
        self.script.write().await.push_back(response);
    }

    /// Queue a successful response with these records.
    pub async fn push_records(&self, records: Vec<CatalogRecord>) {
        self.push_response(MockResponse::Records(records)).await;
    }

    /// Queue a 429 response.
    pub async fn push_rate_limited(&self) {
        self.push_response(MockResponse::RateLimited).await;
    }

    /// Answer one exact query string the same way every time.
    pub async fn set_query_response(&self, query: &str, response: MockResponse) {
        self.by_query
            .write()
            .await
            .insert(query.to_string(), response);
    }

    // =========================================================================
    // Work Configuration
    // =========================================================================

    /// Add a work detail.
    pub async fn add_work(&self, work: WorkDetail) {
        self.works.write().await.insert(work.key.clone(), work);
    }

    /// Make the next work lookup fail with this error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    // =========================================================================
    // Assertions
    // =========================================================================

    /// Searches made so far, in order.
    pub async fn searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Query strings searched so far, in order.
    pub async fn queries(&self) -> Vec<String> {
        self.searches
            .read()
            .await
            .iter()
            .map(|s| s.query.clone())
            .collect()
    }

    /// Scripted responses not yet consumed.
    pub async fn pending_responses(&self) -> usize {
        self.script.read().await.len()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn search(&self, query: &str, limit: u32, _fields: &[&str]) -> Vec<CatalogRecord> {
        self.searches.write().await.push(RecordedSearch {
            query: query.to_string(),
            limit,
            at: Instant::now(),
        });
        self.stats.query_issued();
        self.stats.request_sent();

        let fixed = self.by_query.read().await.get(query).cloned();
        let response = match fixed {
            Some(response) => Some(response),
            None => self.script.write().await.pop_front(),
        };

        match response {
            Some(MockResponse::Records(mut records)) => {
                records.truncate(limit as usize);
                self.stats.records_returned(records.len());
                records
            }
            Some(MockResponse::RateLimited) => {
                self.stats.rate_limited();
                tokio::time::sleep(self.backoff).await;
                Vec::new()
            }
            Some(MockResponse::Failure) => {
                self.stats.failed();
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    async fn work(&self, key: &str) -> Result<Option<WorkDetail>, CatalogError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        let id = key.trim_start_matches("/works/");
        let works = self.works.read().await;
        Ok(works
            .get(key)
            .or_else(|| works.get(&format!("/works/{}", id)))
            .cloned())
    }

    fn stats(&self) -> CatalogStats {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_scripted_responses_in_order() {
        let catalog = MockCatalog::new();
        catalog.push_rate_limited().await;
        catalog.push_records(fixtures::foo_saga_records()).await;

        assert!(catalog.search("a", 100, &[]).await.is_empty());
        assert_eq!(catalog.search("b", 100, &[]).await.len(), 3);
        assert!(catalog.search("c", 100, &[]).await.is_empty());

        let stats = catalog.stats();
        assert_eq!(stats.queries_issued, 3);
        assert_eq!(stats.records_returned, 3);
        assert_eq!(stats.rate_limited, 1);
        assert_eq!(catalog.queries().await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_query_specific_response_and_limit() {
        let catalog = MockCatalog::new();
        catalog
            .set_query_response(
                "\"saga\"",
                MockResponse::Records(fixtures::foo_saga_records()),
            )
            .await;

        assert_eq!(catalog.search("\"saga\"", 2, &[]).await.len(), 2);
        assert_eq!(catalog.search("\"saga\"", 10, &[]).await.len(), 3);
        assert!(catalog.search("other", 10, &[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_sleeps_backoff() {
        let catalog = MockCatalog::new().with_backoff(Duration::from_millis(30));
        catalog.push_rate_limited().await;

        let start = Instant::now();
        catalog.search("a", 10, &[]).await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_work_lookup() {
        let catalog = MockCatalog::new();
        catalog.add_work(fixtures::work_detail("/works/OL1W", "Foo")).await;

        assert!(catalog.work("OL1W").await.unwrap().is_some());
        assert!(catalog.work("/works/OL2W").await.unwrap().is_none());

        catalog.set_next_error(CatalogError::RateLimited).await;
        assert!(catalog.work("/works/OL1W").await.is_err());
        assert!(catalog.work("/works/OL1W").await.unwrap().is_some());
    }
}
