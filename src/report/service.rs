//! The four public operations behind one handle.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, ConfigError};
use crate::models::{DailyRequest, NewsRequest, PaperRequest, Report, WeeklyRequest};
use crate::pipeline::{FetchError, FetchOrchestrator, Normalizer, PaperFetcher};
use crate::sources::{ArxivPaperSource, FeedFetcher, FeedRegistry, PaperSource, RssFetcher};
use crate::utils::{Clock, HttpClient, SystemClock};

use super::{ReportAssembler, ReportBuilder, ReportLimits};

/// Entry point used by the CLI and the MCP tools.
///
/// Cheap to clone; every field is shared.
#[derive(Debug, Clone)]
pub struct NewsService {
    orchestrator: FetchOrchestrator,
    papers: PaperFetcher,
    builder: ReportBuilder,
    clock: Arc<dyn Clock>,
}

impl NewsService {
    /// Assemble a service from explicit parts with default settings
    pub fn new(
        registry: Arc<FeedRegistry>,
        fetcher: Arc<dyn FeedFetcher>,
        paper_source: Arc<dyn PaperSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let normalizer = Normalizer::new(Arc::clone(&clock));
        let orchestrator = FetchOrchestrator::new(registry, fetcher, normalizer.clone());
        let papers = PaperFetcher::new(
            paper_source,
            normalizer.summary_cap(crate::pipeline::PAPER_SUMMARY_CAP),
        );
        Self::from_parts(orchestrator, papers, clock, ReportLimits::default())
    }

    /// Assemble a service from configured pipeline stages
    pub fn from_parts(
        orchestrator: FetchOrchestrator,
        papers: PaperFetcher,
        clock: Arc<dyn Clock>,
        limits: ReportLimits,
    ) -> Self {
        let builder = ReportBuilder::new(orchestrator.clone(), papers.clone(), Arc::clone(&clock))
            .limits(limits);
        Self {
            orchestrator,
            papers,
            builder,
            clock,
        }
    }

    /// Build a service that talks to the real feeds and arXiv
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let registry = Arc::new(config.registry()?);

        let fetch_timeout = Duration::from_secs(config.fetch.timeout_secs);
        let feed_client = Arc::new(HttpClient::with_settings(
            &config.fetch.user_agent,
            fetch_timeout,
        )?);
        let fetcher: Arc<dyn FeedFetcher> = Arc::new(RssFetcher::new(feed_client, fetch_timeout));

        let paper_timeout = Duration::from_secs(config.papers.timeout_secs);
        let paper_client = Arc::new(HttpClient::with_settings(
            &config.fetch.user_agent,
            paper_timeout,
        )?);
        let paper_source: Arc<dyn PaperSource> = Arc::new(ArxivPaperSource::with_endpoint(
            paper_client,
            config.papers.endpoint.clone(),
        ));

        let orchestrator = FetchOrchestrator::new(
            registry,
            fetcher,
            Normalizer::new(Arc::clone(&clock)).summary_cap(config.reports.summary_cap),
        )
        .with_settings(config.orchestrator_settings());
        let papers = PaperFetcher::new(
            paper_source,
            Normalizer::new(Arc::clone(&clock)).summary_cap(config.papers.summary_cap),
        )
        .timeout(paper_timeout);

        Ok(Self::from_parts(
            orchestrator,
            papers,
            clock,
            config.reports.limits(),
        ))
    }

    pub fn registry(&self) -> &FeedRegistry {
        self.orchestrator.registry()
    }

    /// Recent items across the selected categories as a single section.
    ///
    /// Never fails: unreachable sources are skipped and noted, and an empty
    /// result renders as a section with zero items.
    pub async fn fetch_news(&self, request: NewsRequest) -> Report {
        let outcome = self.orchestrator.collect(request.category).await;
        let note = outcome.failure_note();
        let now = self.clock.now();
        let items = self
            .orchestrator
            .select(outcome.items, request.time_range, request.limit, now);

        let heading = format!(
            "{} ({})",
            request.category.name(),
            request.time_range.label()
        );
        let section = ReportAssembler::data_section(heading, items, note);
        ReportAssembler::assemble("AI News", now, vec![section])
    }

    /// Latest papers in the selected subjects, newest first.
    ///
    /// Fails when the paper endpoint cannot be reached or answers with an
    /// error; there is no partial result.
    pub async fn fetch_papers(&self, request: PaperRequest) -> Result<Report, FetchError> {
        let items = self.papers.fetch(request).await?;
        let heading = format!(
            "{}: {} ({})",
            self.papers.source_name(),
            request.category.name(),
            request.category.id()
        );
        let section = ReportAssembler::data_section(heading, items, None);
        Ok(ReportAssembler::assemble(
            "AI Research Papers",
            self.clock.now(),
            vec![section],
        ))
    }

    pub async fn build_daily_report(&self, request: &DailyRequest) -> Report {
        self.builder.build_daily(request).await
    }

    pub async fn build_weekly_report(&self, request: &WeeklyRequest) -> Report {
        self.builder.build_weekly(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryFilter, FeedSource, PaperCategory, RawItem, TimeWindow};
    use crate::sources::{MockFetcher, MockPaperSource};
    use crate::utils::FixedClock;
    use chrono::{TimeZone, Utc};

    fn service(fetcher: Arc<MockFetcher>, papers: Arc<MockPaperSource>) -> NewsService {
        let registry = FeedRegistry::new(vec![
            FeedSource::new("Wire", "mock://wire", Category::News),
            FeedSource::new("Studio", "mock://studio", Category::Gaming),
        ])
        .unwrap();
        NewsService::new(
            Arc::new(registry),
            fetcher,
            papers,
            Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
            )),
        )
    }

    fn raw(title: &str, published: &str) -> RawItem {
        RawItem {
            title: Some(title.to_string()),
            published: Some(published.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_news_single_section() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items("Wire", vec![raw("Monthly piece", "2026-09-20T00:00:00Z")]);
        fetcher.set_items("Studio", vec![raw("This week", "2026-10-12T00:00:00Z")]);

        let request = NewsRequest::new()
            .time_range(TimeWindow::Monthly)
            .category(CategoryFilter::All);
        let report = service(fetcher, Arc::new(MockPaperSource::new()))
            .fetch_news(request)
            .await;

        assert_eq!(report.sections.len(), 1);
        let section = &report.sections[0];
        assert_eq!(section.heading, "All Categories (last 30 days)");
        let titles: Vec<&str> = section.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["This week", "Monthly piece"]);
    }

    #[tokio::test]
    async fn test_fresh_copy_survives_stale_duplicate() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items("Wire", vec![raw("Lab ships model", "2026-10-10T12:00:00Z")]);
        fetcher.set_items("Studio", vec![raw("Lab ships model", "2026-10-16T10:00:00Z")]);

        let report = service(fetcher, Arc::new(MockPaperSource::new()))
            .fetch_news(NewsRequest::new().time_range(TimeWindow::Daily))
            .await;

        assert_eq!(report.item_count(), 1);
        assert_eq!(report.sections[0].items[0].source, "Studio");
    }

    #[tokio::test]
    async fn test_fetch_papers_reports_upstream_failure() {
        let papers = Arc::new(MockPaperSource::new());
        papers.set_failure("down");

        let err = service(Arc::new(MockFetcher::new()), papers)
            .fetch_papers(PaperRequest::new().category(PaperCategory::MachineLearning))
            .await
            .unwrap_err();
        assert_eq!(err.upstream, "Mock Papers");
    }

    #[tokio::test]
    async fn test_fetch_papers_heading_names_subject() {
        let papers = Arc::new(MockPaperSource::new());
        papers.set_items(vec![raw("Sparse attention", "2026-10-15T00:00:00Z")]);

        let report = service(Arc::new(MockFetcher::new()), papers)
            .fetch_papers(PaperRequest::new().category(PaperCategory::ComputationLanguage))
            .await
            .unwrap();
        assert_eq!(
            report.sections[0].heading,
            "Mock Papers: Computation and Language (cs.CL)"
        );
        assert_eq!(report.item_count(), 1);
    }
}
