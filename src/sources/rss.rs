//! RSS/Atom feed fetcher.

use async_trait::async_trait;
use feed_rs::parser;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{FeedSource, RawItem};
use crate::sources::{FeedFetcher, SourceError};
use crate::utils::HttpClient;

const FEED_ACCEPT: &str =
    "application/rss+xml, application/atom+xml, application/xml;q=0.9, text/xml;q=0.8";

/// Fetches RSS 2.0, Atom and JSON feeds over HTTP
#[derive(Debug, Clone)]
pub struct RssFetcher {
    client: Arc<HttpClient>,
    timeout: Duration,
}

impl RssFetcher {
    /// Create a fetcher; `timeout` is reported in errors when the client gives up
    pub fn new(client: Arc<HttpClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl FeedFetcher for RssFetcher {
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<RawItem>, SourceError> {
        tracing::debug!("Fetching feed {} from {}", source.name, source.endpoint);

        let response = self
            .client
            .get(&source.endpoint)
            .header("Accept", FEED_ACCEPT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(self.timeout)
                } else {
                    SourceError::Network(format!("Failed to fetch {}: {}", source.name, e))
                }
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                url: source.endpoint.clone(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        parse_feed(bytes.as_ref())
    }
}

/// Parse a feed document into raw entries
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawItem>, SourceError> {
    let feed = parser::parse(bytes)?;
    Ok(feed.entries.iter().map(entry_to_raw).collect())
}

/// Map a parsed feed entry onto the loose raw shape
pub fn entry_to_raw(entry: &feed_rs::model::Entry) -> RawItem {
    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone())
        .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()));

    let summary = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()));

    let authors = entry
        .authors
        .iter()
        .map(|a| a.name.trim())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    RawItem {
        title: entry.title.as_ref().map(|t| t.content.clone()),
        link,
        published: entry.published.or(entry.updated).map(|d| d.to_rfc3339()),
        summary,
        author: (!authors.is_empty()).then_some(authors),
        category: entry.categories.first().map(|c| c.term.clone()),
    }
}
