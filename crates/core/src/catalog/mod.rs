//! Bibliographic catalog access.
//!
//! The [`Catalog`] trait is what the harvest driver talks to. Searches never
//! fail from the caller's point of view: transient problems (429, 5xx,
//! timeouts, undecodable bodies) are logged, counted and turned into an empty
//! result so a long harvest keeps going.

mod openlibrary;
mod pacing;
mod types;

pub use openlibrary::{OpenLibraryClient, OpenLibraryConfig};
pub use pacing::Pacer;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog answered 429.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimited,

    /// Non-success status other than 404/429.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Connection or other transport failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Body was not the JSON we expected.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    /// Whether repeating the same request may help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Transport(_))
    }

    /// Short label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Http { .. } => "http_error",
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport_error",
            Self::Decode(_) => "decode_error",
            Self::NotFound(_) => "not_found",
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Transport(e.to_string())
        }
    }
}

/// A searchable bibliographic catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Run one search and return its hits in catalog order.
    ///
    /// Transient failures degrade to an empty list.
    async fn search(&self, query: &str, limit: u32, fields: &[&str]) -> Vec<CatalogRecord>;

    /// Fetch work-level detail. `Ok(None)` when the work does not exist.
    async fn work(&self, key: &str) -> Result<Option<WorkDetail>, CatalogError>;

    /// Current counters.
    fn stats(&self) -> CatalogStats;
}
