//! Daily and weekly composite reports.

use futures_util::future::join_all;
use std::sync::Arc;

use crate::models::{
    Category, CategoryFilter, DailyRequest, DailySection, NormalizedItem, PaperRequest, Report,
    ReportSection, TimeWindow, WeeklyRequest,
};
use crate::pipeline::{FetchOrchestrator, PaperFetcher};
use crate::utils::Clock;

use super::ReportAssembler;

/// Heading of the papers section in the daily report
pub const PAPERS_HEADING: &str = "arXiv Papers";

/// Heading of the all-category section in the weekly report
pub const ROUNDUP_HEADING: &str = "Weekly News Roundup";

const DAILY_PLACEHOLDERS: [(&str, &str); 2] = [
    (
        "Key Insights",
        "Summarize the most significant developments above and why they matter.",
    ),
    (
        "Action Items",
        "List concrete follow-ups worth investigating based on today's items.",
    ),
];

const WEEKLY_PLACEHOLDERS: [(&str, &str); 2] = [
    (
        "Trend Analysis",
        "Identify recurring themes across the week and how they are shifting.",
    ),
    (
        "Strategic Recommendations",
        "Suggest priorities for the coming week given the trends observed.",
    ),
];

/// Per-section item limits for composite reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLimits {
    pub daily: usize,
    pub weekly: usize,
    pub focus: usize,
    pub papers: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            daily: 10,
            weekly: 50,
            focus: 10,
            papers: 10,
        }
    }
}

/// Knows the daily and weekly templates and fills them from the pipeline.
///
/// Builds never fail: a category with no reachable source renders as an
/// empty section, and a failed paper search renders as an empty papers
/// section carrying the error as its note.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    orchestrator: FetchOrchestrator,
    papers: PaperFetcher,
    clock: Arc<dyn Clock>,
    limits: ReportLimits,
}

impl ReportBuilder {
    pub fn new(orchestrator: FetchOrchestrator, papers: PaperFetcher, clock: Arc<dyn Clock>) -> Self {
        Self {
            orchestrator,
            papers,
            clock,
            limits: ReportLimits::default(),
        }
    }

    pub fn limits(mut self, limits: ReportLimits) -> Self {
        self.limits = limits;
        self
    }

    /// One data section per requested section, in request order, followed
    /// by the narrative placeholders
    pub async fn build_daily(&self, request: &DailyRequest) -> Report {
        let mut sections: Vec<ReportSection> = join_all(
            request
                .sections()
                .iter()
                .map(|section| self.daily_section(*section)),
        )
        .await;

        sections.extend(
            DAILY_PLACEHOLDERS
                .iter()
                .map(|(heading, prompt)| ReportAssembler::placeholder_section(*heading, prompt)),
        );

        let generated_at = self.clock.now();
        ReportAssembler::assemble(
            format!("AI Daily Report {}", generated_at.format("%Y-%m-%d")),
            generated_at,
            sections,
        )
    }

    async fn daily_section(&self, section: DailySection) -> ReportSection {
        match section.feed_category() {
            Some(category) => {
                let outcome = self.orchestrator.collect(category.into()).await;
                let note = outcome.failure_note();
                let items = self.orchestrator.select(
                    outcome.items,
                    TimeWindow::Daily,
                    self.limits.daily,
                    self.clock.now(),
                );
                ReportAssembler::data_section(category.name(), items, note)
            }
            None => {
                let request = PaperRequest::new().max_results(self.limits.papers);
                match self.papers.fetch(request).await {
                    Ok(items) => ReportAssembler::data_section(PAPERS_HEADING, items, None),
                    Err(e) => {
                        ReportAssembler::data_section(PAPERS_HEADING, Vec::new(), Some(e.to_string()))
                    }
                }
            }
        }
    }

    /// A roundup across every category, one section per focus area drawn
    /// from the same pool, then the narrative placeholders
    pub async fn build_weekly(&self, request: &WeeklyRequest) -> Report {
        let outcome = self.orchestrator.collect(CategoryFilter::All).await;
        let note = outcome.failure_note();
        let pool = self.orchestrator.select(
            outcome.items,
            TimeWindow::Weekly,
            usize::MAX,
            self.clock.now(),
        );

        let mut sections = Vec::with_capacity(request.focus_areas().len() + 3);
        let roundup: Vec<NormalizedItem> = pool.iter().take(self.limits.weekly).cloned().collect();
        sections.push(ReportAssembler::data_section(ROUNDUP_HEADING, roundup, note));

        for area in request.focus_areas() {
            let matcher = FocusMatcher::new(area);
            let items: Vec<NormalizedItem> = pool
                .iter()
                .filter(|item| matcher.matches(item))
                .take(self.limits.focus)
                .cloned()
                .collect();
            sections.push(ReportAssembler::data_section(
                format!("Focus: {}", area),
                items,
                None,
            ));
        }

        sections.extend(
            WEEKLY_PLACEHOLDERS
                .iter()
                .map(|(heading, prompt)| ReportAssembler::placeholder_section(*heading, prompt)),
        );

        let generated_at = self.clock.now();
        ReportAssembler::assemble(
            format!("AI Weekly Report {}", generated_at.format("%Y-%m-%d")),
            generated_at,
            sections,
        )
    }
}

/// Focus keywords this short only match whole words
const WHOLE_WORD_MAX: usize = 2;

/// Keyword match for a weekly focus area.
///
/// The label is split on `-`, `_` and whitespace; an item matches when every
/// keyword starts some word of its title or summary. Keywords of up to
/// [`WHOLE_WORD_MAX`] characters must equal a whole word, so `ai` does not
/// match `air`. A label naming a feed category also matches every item from
/// that category.
#[derive(Debug, Clone)]
pub(crate) struct FocusMatcher {
    keywords: Vec<String>,
    category: Option<Category>,
}

impl FocusMatcher {
    pub(crate) fn new(label: &str) -> Self {
        let keywords = label
            .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self {
            keywords,
            category: label.parse().ok(),
        }
    }

    pub(crate) fn matches(&self, item: &NormalizedItem) -> bool {
        if let Some(category) = self.category {
            if item.category == category.id() {
                return true;
            }
        }
        if self.keywords.is_empty() {
            return false;
        }

        let text = format!(
            "{} {}",
            item.title,
            item.summary.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        let words: Vec<&str> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        self.keywords.iter().all(|keyword| {
            words.iter().any(|word| {
                if keyword.chars().count() <= WHOLE_WORD_MAX {
                    *word == keyword.as_str()
                } else {
                    word.starts_with(keyword.as_str())
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedSource, RawItem};
    use crate::pipeline::Normalizer;
    use crate::sources::mock::{MockFetcher, MockPaperSource};
    use crate::sources::FeedRegistry;
    use crate::utils::FixedClock;
    use chrono::{DateTime, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn raw(title: &str, published: &str, summary: Option<&str>) -> RawItem {
        RawItem {
            title: Some(title.to_string()),
            link: Some(format!("https://example.com/{}", title.replace(' ', "-"))),
            published: Some(published.to_string()),
            summary: summary.map(str::to_string),
            ..Default::default()
        }
    }

    fn builder(fetcher: Arc<MockFetcher>, papers: Arc<MockPaperSource>) -> ReportBuilder {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now()));
        let registry = Arc::new(
            FeedRegistry::new(vec![
                FeedSource::new("Lab", "mock://lab", Category::Research),
                FeedSource::new("Wire", "mock://wire", Category::News),
                FeedSource::new("Studio", "mock://studio", Category::Gaming),
            ])
            .unwrap(),
        );
        let normalizer = Normalizer::new(Arc::clone(&clock));
        ReportBuilder::new(
            FetchOrchestrator::new(registry, fetcher, normalizer.clone()),
            PaperFetcher::new(papers, normalizer),
            clock,
        )
    }

    fn item(title: &str, category: &str, summary: Option<&str>) -> NormalizedItem {
        NormalizedItem {
            title: title.to_string(),
            link: String::new(),
            published_at: now(),
            source: "Feed".to_string(),
            category: category.to_string(),
            summary: summary.map(str::to_string),
            author: None,
        }
    }

    #[test]
    fn test_focus_matcher_splits_label() {
        let matcher = FocusMatcher::new("generative-ai");
        assert!(matcher.matches(&item("New generative model", "news", Some("An AI lab shipped it"))));
        assert!(!matcher.matches(&item("Generative art fair", "news", None)));
        assert!(!matcher.matches(&item("Said and done", "news", Some("generative"))));
        assert!(!matcher.matches(&item("Generative design aims for air taxis", "news", None)));
        assert!(matcher.matches(&item("Generatively tuned AI", "news", None)));
    }

    #[test]
    fn test_focus_matcher_uses_category_label() {
        let matcher = FocusMatcher::new("gaming");
        assert!(matcher.matches(&item("Quarterly results", "gaming", None)));
        assert!(matcher.matches(&item("Gaming handhelds get NPUs", "news", None)));
        assert!(!matcher.matches(&item("Chip export rules", "news", None)));
    }

    #[tokio::test]
    async fn test_daily_sections_follow_request_order() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items("Wire", vec![raw("Wire story", "2026-10-16T08:00:00Z", None)]);
        fetcher.set_items("Lab", vec![raw("Lab post", "2026-10-16T07:00:00Z", None)]);

        let report = builder(fetcher, Arc::new(MockPaperSource::new()))
            .build_daily(&DailyRequest::new([DailySection::News, DailySection::Research]))
            .await;

        let data: Vec<&str> = report.data_sections().map(|s| s.heading.as_str()).collect();
        assert_eq!(data, vec!["Industry News", "Research Labs"]);
        assert_eq!(report.title, "AI Daily Report 2026-10-16");
        assert!(report.section("Key Insights").is_some_and(|s| !s.is_data()));
        assert!(report.section("Action Items").is_some());
    }

    #[tokio::test]
    async fn test_daily_papers_failure_degrades_to_note() {
        let papers = Arc::new(MockPaperSource::new());
        papers.set_failure("maintenance");

        let report = builder(Arc::new(MockFetcher::new()), papers)
            .build_daily(&DailyRequest::new([DailySection::Papers, DailySection::Gaming]))
            .await;

        let section = report.section(PAPERS_HEADING).unwrap();
        assert!(section.is_empty());
        assert!(section.note.as_deref().unwrap().contains("fetch_papers failed"));
        assert!(report.section("Gaming & AI").is_some_and(ReportSection::is_empty));
    }

    #[tokio::test]
    async fn test_daily_window_drops_old_items() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items(
            "Studio",
            vec![
                raw("Fresh", "2026-10-16T10:00:00Z", None),
                raw("Stale", "2026-10-10T10:00:00Z", None),
            ],
        );

        let report = builder(fetcher, Arc::new(MockPaperSource::new()))
            .build_daily(&DailyRequest::new([DailySection::Gaming]))
            .await;
        let section = report.section("Gaming & AI").unwrap();
        assert_eq!(section.len(), 1);
        assert_eq!(section.items[0].title, "Fresh");
    }

    #[tokio::test]
    async fn test_weekly_layout() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.set_items(
            "Wire",
            vec![
                raw("Multimodal assistant launches", "2026-10-14T10:00:00Z", None),
                raw("Old news", "2026-09-01T10:00:00Z", None),
            ],
        );
        fetcher.set_items("Studio", vec![raw("Engine update", "2026-10-15T10:00:00Z", None)]);

        let report = builder(fetcher, Arc::new(MockPaperSource::new()))
            .build_weekly(&WeeklyRequest::new(["gaming", "multimodal", "robotics"]))
            .await;

        let headings: Vec<&str> = report.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec![
                ROUNDUP_HEADING,
                "Focus: gaming",
                "Focus: multimodal",
                "Focus: robotics",
                "Trend Analysis",
                "Strategic Recommendations",
            ]
        );

        let roundup = report.section(ROUNDUP_HEADING).unwrap();
        let titles: Vec<&str> = roundup.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Engine update", "Multimodal assistant launches"]);
        assert_eq!(report.section("Focus: gaming").unwrap().len(), 1);
        assert_eq!(report.section("Focus: multimodal").unwrap().len(), 1);
        assert!(report.section("Focus: robotics").unwrap().is_empty());
        assert!(report
            .section("Trend Analysis")
            .unwrap()
            .rendered_body
            .contains("To be completed"));
    }
}
