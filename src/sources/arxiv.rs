//! arXiv listing source for the paper fetcher.

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{PaperCategory, RawItem};
use crate::sources::{parse_feed, PaperSource, SourceError};
use crate::utils::HttpClient;

/// Base URL for arXiv API
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// arXiv caps a single listing page at this many entries
const ARXIV_MAX_RESULTS: usize = 200;

/// Queries the arXiv export API for the newest submissions in a subject
#[derive(Debug, Clone)]
pub struct ArxivPaperSource {
    client: Arc<HttpClient>,
    endpoint: String,
}

impl ArxivPaperSource {
    /// Create a source against the public arXiv API
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self::with_endpoint(client, ARXIV_API_URL)
    }

    /// Create with a custom endpoint (mirrors, tests)
    pub fn with_endpoint(client: Arc<HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Build the `search_query` expression for a subject selection
    fn build_search_query(category: PaperCategory) -> String {
        category
            .subjects()
            .iter()
            .map(|c| format!("cat:{}", c.id()))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    fn build_url(&self, category: PaperCategory, max_results: usize) -> String {
        format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.endpoint,
            urlencoding::encode(&Self::build_search_query(category)),
            max_results.clamp(1, ARXIV_MAX_RESULTS)
        )
    }
}

#[async_trait]
impl PaperSource for ArxivPaperSource {
    fn name(&self) -> &str {
        "arXiv"
    }

    async fn search(
        &self,
        category: PaperCategory,
        max_results: usize,
    ) -> Result<Vec<RawItem>, SourceError> {
        let url = self.build_url(category, max_results);
        tracing::debug!("Querying arXiv: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        let mut items = parse_feed(bytes.as_ref())?;
        items.truncate(max_results);
        Ok(items)
    }
}
