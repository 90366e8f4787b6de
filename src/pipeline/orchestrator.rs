//! Concurrent fetch of every matching feed source.

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::models::{CategoryFilter, FeedSource, NormalizedItem, RawItem, TimeWindow};
use crate::sources::{FeedFetcher, FeedRegistry, SourceError};
use crate::utils::deduplicate_items;

use super::{window, Normalizer};

/// Default per-source fetch timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Default number of fetches in flight at once
pub const DEFAULT_MAX_CONCURRENT: usize = 16;

/// Knobs for one orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorSettings {
    /// Budget for each individual source
    pub per_source_timeout: Duration,
    /// Budget for the whole fan-out; sources still running when it elapses
    /// count as timed out
    pub overall_timeout: Option<Duration>,
    pub max_concurrent: usize,
    /// Collapse the same story reported by several feeds
    pub dedupe: bool,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            per_source_timeout: DEFAULT_FETCH_TIMEOUT,
            overall_timeout: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            dedupe: true,
        }
    }
}

/// A source that contributed nothing because its fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// Everything one orchestration produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Normalized items from every source that responded, in registry order
    pub items: Vec<NormalizedItem>,
    pub failures: Vec<SourceFailure>,
    /// Number of sources a fetch was issued for
    pub attempted: usize,
}

impl FetchOutcome {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failures.len()
    }

    /// One-line summary of unavailable sources, if any failed
    pub fn failure_note(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.failures.iter().map(|f| f.source.as_str()).collect();
        Some(format!(
            "{} of {} sources unavailable: {}",
            self.failures.len(),
            self.attempted,
            names.join(", ")
        ))
    }
}

/// Issues one fetch per matching source and merges whatever comes back.
///
/// A failing or slow source only costs its own items: errors and timeouts
/// are recorded as [`SourceFailure`]s and never abort sibling fetches. Each
/// fetch writes into its own result slot; slots are merged in registry
/// order once every fetch has settled. [`FetchOrchestrator::select`] turns
/// the merged pool into a windowed, deduplicated list.
#[derive(Debug, Clone)]
pub struct FetchOrchestrator {
    registry: Arc<FeedRegistry>,
    fetcher: Arc<dyn FeedFetcher>,
    normalizer: Normalizer,
    settings: OrchestratorSettings,
}

impl FetchOrchestrator {
    pub fn new(
        registry: Arc<FeedRegistry>,
        fetcher: Arc<dyn FeedFetcher>,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            registry,
            fetcher,
            normalizer,
            settings: OrchestratorSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Fetch every source passing `filter`; never fails
    pub async fn collect(&self, filter: CategoryFilter) -> FetchOutcome {
        let sources = self.registry.matching(filter);
        let attempted = sources.len();
        if attempted == 0 {
            tracing::debug!("No sources registered for category '{}'", filter);
            return FetchOutcome::default();
        }

        let started = Instant::now();
        let deadline = self
            .settings
            .overall_timeout
            .and_then(|t| started.checked_add(t));
        let per_source = self.settings.per_source_timeout;

        // Completion order is arbitrary; the index restores registry order
        let fetcher = Arc::clone(&self.fetcher);
        let mut slots: Vec<(usize, FeedSource, Result<Vec<RawItem>, SourceError>)> =
            stream::iter(sources.into_iter().cloned().enumerate())
                .map(|(index, source)| {
                    let fetcher = Arc::clone(&fetcher);
                    async move {
                        let result =
                            fetch_bounded(fetcher.as_ref(), &source, per_source, deadline).await;
                        (index, source, result)
                    }
                })
                .buffer_unordered(self.settings.max_concurrent.max(1))
                .collect()
                .await;
        slots.sort_by_key(|(index, _, _)| *index);

        let mut outcome = FetchOutcome {
            attempted,
            ..Default::default()
        };

        for (_, source, result) in slots {
            match result {
                Ok(raws) => {
                    let items = self.normalizer.normalize_all(&raws, &source);
                    tracing::debug!("{} returned {} items", source.name, items.len());
                    outcome.items.extend(items);
                }
                Err(e) => {
                    tracing::warn!("Fetch failed for {}: {}", source.name, e);
                    outcome.failures.push(SourceFailure {
                        source: source.name,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Fetched category '{}': {}/{} sources responded, {} items in {:?}",
            filter,
            outcome.succeeded(),
            attempted,
            outcome.items.len(),
            started.elapsed()
        );

        outcome
    }

    /// Window, order and cap a collected pool.
    ///
    /// Duplicates collapse after the window is applied and the pool is sorted,
    /// so the copy kept for a story is its newest one inside the window.
    pub fn select(
        &self,
        items: Vec<NormalizedItem>,
        window: TimeWindow,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<NormalizedItem> {
        let mut kept = window::filter_and_sort(items, window, usize::MAX, now);
        if self.settings.dedupe {
            kept = deduplicate_items(kept);
        }
        kept.truncate(limit);
        kept
    }
}

/// Run one fetch under the per-source timeout, clipped to the overall deadline.
/// A budget too large to express as an instant means no deadline.
async fn fetch_bounded(
    fetcher: &dyn FeedFetcher,
    source: &FeedSource,
    per_source: Duration,
    deadline: Option<Instant>,
) -> Result<Vec<RawItem>, SourceError> {
    let now = Instant::now();
    let effective = match (now.checked_add(per_source), deadline) {
        (Some(own), Some(overall)) => Some(own.min(overall)),
        (own, overall) => own.or(overall),
    };

    let Some(at) = effective else {
        return fetcher.fetch(source).await;
    };
    match tokio::time::timeout_at(at, fetcher.fetch(source)).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout(at.saturating_duration_since(now))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, FeedSource};
    use crate::sources::mock::{make_raw_item, MockFetcher, MockResponse};
    use crate::utils::FixedClock;
    use chrono::TimeZone;

    fn registry() -> Arc<FeedRegistry> {
        Arc::new(
            FeedRegistry::new(vec![
                FeedSource::new("alpha", "mock://alpha", Category::News),
                FeedSource::new("beta", "mock://beta", Category::News),
                FeedSource::new("gamma", "mock://gamma", Category::Gaming),
            ])
            .unwrap(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn orchestrator(fetcher: Arc<MockFetcher>) -> FetchOrchestrator {
        let clock = Arc::new(FixedClock::new(now()));
        FetchOrchestrator::new(registry(), fetcher, Normalizer::new(clock)).with_settings(
            OrchestratorSettings {
                per_source_timeout: Duration::from_millis(200),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_failed_source_is_skipped() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items("alpha", vec![make_raw_item("Alpha one", None)]);
        fetcher.set_failure("beta", "connection reset");
        fetcher.set_items("gamma", vec![make_raw_item("Gamma one", None)]);

        let outcome = orchestrator(fetcher).collect(CategoryFilter::All).await;

        let sources: Vec<&str> = outcome.items.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, vec!["alpha", "gamma"]);
        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failures[0].source, "beta");
        assert!(outcome.failures[0].error.contains("connection reset"));
        assert_eq!(
            outcome.failure_note().unwrap(),
            "1 of 3 sources unavailable: beta"
        );
    }

    #[tokio::test]
    async fn test_slow_source_times_out_without_blocking_siblings() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items("alpha", vec![make_raw_item("Fast", None)]);
        fetcher.set_response(
            "beta",
            MockResponse::Delayed(Duration::from_secs(30), vec![make_raw_item("Slow", None)]),
        );

        let started = std::time::Instant::now();
        let outcome = orchestrator(fetcher)
            .collect(CategoryFilter::Only(Category::News))
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].title, "Fast");
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].error.starts_with("Timed out"));
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty_outcome() {
        let fetcher = Arc::new(MockFetcher::new());
        for name in ["alpha", "beta", "gamma"] {
            fetcher.set_failure(name, "dns failure");
        }

        let outcome = orchestrator(fetcher).collect(CategoryFilter::All).await;
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.failures.len(), 3);
        assert_eq!(outcome.succeeded(), 0);
    }

    #[tokio::test]
    async fn test_category_filter_limits_fetches() {
        let fetcher = Arc::new(MockFetcher::new());
        let outcome = orchestrator(Arc::clone(&fetcher))
            .collect(CategoryFilter::Only(Category::Gaming))
            .await;

        assert_eq!(outcome.attempted, 1);
        assert_eq!(fetcher.calls(), vec!["gamma".to_string()]);
    }

    #[tokio::test]
    async fn test_overall_timeout_clips_per_source_budget() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_response(
            "alpha",
            MockResponse::Delayed(Duration::from_millis(150), vec![make_raw_item("Late", None)]),
        );

        let outcome = orchestrator(fetcher)
            .with_settings(OrchestratorSettings {
                per_source_timeout: Duration::from_secs(10),
                overall_timeout: Some(Duration::from_millis(50)),
                ..Default::default()
            })
            .collect(CategoryFilter::Only(Category::News))
            .await;

        assert!(outcome.items.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].source, "alpha");
    }

    #[tokio::test]
    async fn test_duplicates_across_sources_collapse() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items("alpha", vec![make_raw_item("Shared story", None)]);
        fetcher.set_items("beta", vec![make_raw_item("Shared Story!", None)]);

        let orchestrator = orchestrator(Arc::clone(&fetcher));
        let outcome = orchestrator
            .collect(CategoryFilter::Only(Category::News))
            .await;
        assert_eq!(outcome.items.len(), 2);

        let items = orchestrator.select(outcome.items.clone(), TimeWindow::Daily, 10, now());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "alpha");

        let keep_all = orchestrator.with_settings(OrchestratorSettings {
            dedupe: false,
            ..Default::default()
        });
        assert_eq!(
            keep_all.select(outcome.items, TimeWindow::Daily, 10, now()).len(),
            2
        );
    }

    #[tokio::test]
    async fn test_stale_duplicate_does_not_hide_fresh_copy() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items(
            "alpha",
            vec![make_raw_item("Lab ships model", Some("2026-10-10T12:00:00Z"))],
        );
        fetcher.set_items(
            "beta",
            vec![make_raw_item("Lab ships model", Some("2026-10-16T10:00:00Z"))],
        );

        let orchestrator = orchestrator(fetcher);
        let outcome = orchestrator
            .collect(CategoryFilter::Only(Category::News))
            .await;

        let daily = orchestrator.select(outcome.items.clone(), TimeWindow::Daily, 10, now());
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].source, "beta");

        let weekly = orchestrator.select(outcome.items, TimeWindow::Weekly, 10, now());
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].source, "beta");
    }

    #[tokio::test]
    async fn test_select_caps_after_collapsing_duplicates() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items(
            "alpha",
            vec![
                make_raw_item("First", Some("2026-10-16T11:00:00Z")),
                make_raw_item("Second", Some("2026-10-16T10:00:00Z")),
            ],
        );
        fetcher.set_items(
            "beta",
            vec![make_raw_item("First", Some("2026-10-16T11:30:00Z"))],
        );

        let orchestrator = orchestrator(fetcher);
        let outcome = orchestrator
            .collect(CategoryFilter::Only(Category::News))
            .await;
        let items = orchestrator.select(outcome.items, TimeWindow::Daily, 2, now());

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(items[0].source, "beta");
    }

    #[tokio::test]
    async fn test_slow_source_does_not_hold_back_queued_sources() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_response(
            "alpha",
            MockResponse::Delayed(Duration::from_secs(10), vec![make_raw_item("Stuck", None)]),
        );
        fetcher.set_items("beta", vec![make_raw_item("Instant", None)]);
        fetcher.set_response(
            "gamma",
            MockResponse::Delayed(Duration::from_millis(150), vec![make_raw_item("Queued", None)]),
        );

        let outcome = orchestrator(fetcher)
            .with_settings(OrchestratorSettings {
                per_source_timeout: Duration::from_millis(300),
                overall_timeout: Some(Duration::from_millis(400)),
                max_concurrent: 2,
                dedupe: true,
            })
            .collect(CategoryFilter::All)
            .await;

        let titles: Vec<&str> = outcome.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Instant", "Queued"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].source, "alpha");
    }

    #[tokio::test]
    async fn test_huge_timeouts_mean_no_deadline() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items("alpha", vec![make_raw_item("Alpha one", None)]);
        fetcher.set_items("gamma", vec![make_raw_item("Gamma one", None)]);

        let outcome = orchestrator(fetcher)
            .with_settings(OrchestratorSettings {
                per_source_timeout: Duration::from_secs(u64::MAX),
                overall_timeout: Some(Duration::MAX),
                ..Default::default()
            })
            .collect(CategoryFilter::All)
            .await;

        assert_eq!(outcome.items.len(), 2);
        assert!(outcome.failures.is_empty());
    }
}
