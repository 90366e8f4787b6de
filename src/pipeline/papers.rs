//! Single-request paper listing path.

use std::sync::Arc;
use std::time::Duration;

use crate::models::{NormalizedItem, PaperRequest};
use crate::sources::{PaperSource, SourceError};

use super::{FetchError, Normalizer};

/// Default timeout for the paper search request
pub const DEFAULT_PAPER_TIMEOUT: Duration = Duration::from_secs(30);

/// Queries one paper endpoint and normalizes its entries.
///
/// There is exactly one upstream, so its failure is the caller's failure:
/// errors come back as [`FetchError`] rather than an empty list. The
/// endpoint's own newest-first ordering is kept as-is.
#[derive(Debug, Clone)]
pub struct PaperFetcher {
    source: Arc<dyn PaperSource>,
    normalizer: Normalizer,
    timeout: Duration,
}

impl PaperFetcher {
    pub fn new(source: Arc<dyn PaperSource>, normalizer: Normalizer) -> Self {
        Self {
            source,
            normalizer,
            timeout: DEFAULT_PAPER_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Name of the upstream, used as the item source
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn fetch(&self, request: PaperRequest) -> Result<Vec<NormalizedItem>, FetchError> {
        let upstream = self.source.name();
        let search = self.source.search(request.category, request.max_results);

        let raws = match tokio::time::timeout(self.timeout, search).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.timeout)),
        }
        .map_err(|source| {
            tracing::warn!("Paper search on {} failed: {}", upstream, source);
            FetchError::new("fetch_papers", upstream, source)
        })?;

        let fallback_category = request.category.id();
        let items: Vec<NormalizedItem> = raws
            .iter()
            .filter_map(|raw| {
                let category = raw.category.as_deref().unwrap_or(fallback_category);
                self.normalizer.normalize(raw, upstream, category)
            })
            .take(request.max_results)
            .collect();

        tracing::info!(
            "Fetched {} papers for '{}' from {}",
            items.len(),
            request.category,
            upstream
        );
        Ok(items)
    }
}
