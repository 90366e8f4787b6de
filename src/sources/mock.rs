//! Mock sources for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::models::{FeedSource, PaperCategory, RawItem};
use crate::sources::{FeedFetcher, PaperSource, SourceError};

/// Canned behaviour for one mocked source
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return these entries immediately
    Items(Vec<RawItem>),
    /// Wait, then return these entries
    Delayed(Duration, Vec<RawItem>),
    /// Fail with a network error carrying this message
    Fail(String),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A feed fetcher that returns predefined responses keyed by source name.
///
/// Sources without a configured response yield no entries.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, MockResponse>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response for a source name.
    pub fn set_response(&self, source: &str, response: MockResponse) {
        lock(&self.responses).insert(source.to_string(), response);
    }

    /// Shorthand for an immediate successful response.
    pub fn set_items(&self, source: &str, items: Vec<RawItem>) {
        self.set_response(source, MockResponse::Items(items));
    }

    /// Shorthand for a failing source.
    pub fn set_failure(&self, source: &str, message: &str) {
        self.set_response(source, MockResponse::Fail(message.to_string()));
    }

    /// Names of the sources fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl FeedFetcher for MockFetcher {
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<RawItem>, SourceError> {
        lock(&self.calls).push(source.name.clone());
        let response = lock(&self.responses).get(&source.name).cloned();

        match response {
            Some(MockResponse::Items(items)) => Ok(items),
            Some(MockResponse::Delayed(delay, items)) => {
                tokio::time::sleep(delay).await;
                Ok(items)
            }
            Some(MockResponse::Fail(message)) => Err(SourceError::Network(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// A paper source that returns a predefined result.
#[derive(Debug, Default)]
pub struct MockPaperSource {
    response: Mutex<Option<Result<Vec<RawItem>, String>>>,
    requests: Mutex<Vec<(PaperCategory, usize)>>,
}

impl MockPaperSource {
    /// Create a new mock paper source returning no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these entries from every search.
    pub fn set_items(&self, items: Vec<RawItem>) {
        *lock(&self.response) = Some(Ok(items));
    }

    /// Fail every search with an API error.
    pub fn set_failure(&self, message: &str) {
        *lock(&self.response) = Some(Err(message.to_string()));
    }

    /// The `(category, max_results)` pairs searched so far.
    pub fn requests(&self) -> Vec<(PaperCategory, usize)> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl PaperSource for MockPaperSource {
    fn name(&self) -> &str {
        "Mock Papers"
    }

    async fn search(
        &self,
        category: PaperCategory,
        max_results: usize,
    ) -> Result<Vec<RawItem>, SourceError> {
        lock(&self.requests).push((category, max_results));
        match lock(&self.response).clone() {
            Some(Ok(items)) => Ok(items.into_iter().take(max_results).collect()),
            Some(Err(message)) => Err(SourceError::Status {
                status: 503,
                url: format!("mock://papers ({})", message),
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Helper function to create a raw entry for testing.
pub fn make_raw_item(title: &str, published: Option<&str>) -> RawItem {
    let slug: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    RawItem {
        title: Some(title.to_string()),
        link: Some(format!("http://example.com/{}", slug)),
        published: published.map(|p| p.to_string()),
        summary: None,
        author: None,
        category: None,
    }
}
