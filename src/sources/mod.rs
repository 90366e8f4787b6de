//! Feed sources and the fetch seams the pipeline depends on.
//!
//! A [`FeedSource`](crate::models::FeedSource) is plain configuration: a name,
//! an endpoint and a category. Fetching is behind the [`FeedFetcher`] trait so
//! the orchestrator can run against real HTTP feeds ([`RssFetcher`]) or canned
//! responses ([`MockFetcher`]). The paper path has its own seam,
//! [`PaperSource`], implemented for arXiv by [`ArxivPaperSource`].
//!
//! # Implementing a New Fetcher
//!
//! 1. Create a struct that implements `FeedFetcher`
//! 2. Map each upstream entry to a [`RawItem`]; leave missing fields as `None`
//! 3. Return `Err(SourceError)` for whole-source failures only; the
//!    orchestrator logs them and carries on with the remaining sources

mod arxiv;
pub mod mock;
mod registry;
mod rss;

pub use arxiv::{ArxivPaperSource, ARXIV_API_URL};
pub use mock::{MockFetcher, MockPaperSource, MockResponse};
pub use registry::FeedRegistry;
pub use rss::{entry_to_raw, parse_feed, RssFetcher};

use async_trait::async_trait;
use std::time::Duration;

use crate::models::{FeedSource, PaperCategory, RawItem};

/// Fetches the current entries of one feed source
#[async_trait]
pub trait FeedFetcher: Send + Sync + std::fmt::Debug {
    /// Fetch every entry the source currently publishes
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<RawItem>, SourceError>;
}

/// Queries a single paper search endpoint
#[async_trait]
pub trait PaperSource: Send + Sync + std::fmt::Debug {
    /// Name shown as the item source in reports
    fn name(&self) -> &str;

    /// Most recent entries for the given subject selection, newest first
    async fn search(
        &self,
        category: PaperCategory,
        max_results: usize,
    ) -> Result<Vec<RawItem>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The source did not answer within its time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Parsing error (RSS, Atom, XML)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters or source definition
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<feed_rs::parser::ParseFeedError> for SourceError {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        SourceError::Parse(format!("feed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_cause() {
        let err = SourceError::Status {
            status: 503,
            url: "https://example.com/feed".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP status 503 from https://example.com/feed");

        let err = SourceError::Timeout(Duration::from_secs(15));
        assert_eq!(err.to_string(), "Timed out after 15s");
    }
}
