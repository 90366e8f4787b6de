//! Request models for the four pipeline operations.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{Category, CategoryFilter, ParseEnumError};

/// Fixed lookback duration used to filter items by recency.
///
/// Durations are not calendar-aware: a month is always 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl TimeWindow {
    pub fn duration(&self) -> Duration {
        match self {
            TimeWindow::Daily => Duration::hours(24),
            TimeWindow::Weekly => Duration::hours(7 * 24),
            TimeWindow::Monthly => Duration::hours(30 * 24),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            TimeWindow::Daily => "daily",
            TimeWindow::Weekly => "weekly",
            TimeWindow::Monthly => "monthly",
        }
    }

    /// Human-readable span for headings
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Daily => "last 24 hours",
            TimeWindow::Weekly => "last 7 days",
            TimeWindow::Monthly => "last 30 days",
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for TimeWindow {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(TimeWindow::Daily),
            "weekly" => Ok(TimeWindow::Weekly),
            "monthly" => Ok(TimeWindow::Monthly),
            _ => Err(ParseEnumError::new(
                "time range",
                s,
                "daily, weekly, monthly",
            )),
        }
    }
}

/// Parameters for `fetch_news`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsRequest {
    pub time_range: TimeWindow,
    pub category: CategoryFilter,
    pub limit: usize,
}

impl Default for NewsRequest {
    fn default() -> Self {
        Self {
            time_range: TimeWindow::Daily,
            category: CategoryFilter::All,
            limit: NewsRequest::DEFAULT_LIMIT,
        }
    }
}

impl NewsRequest {
    pub const DEFAULT_LIMIT: usize = 20;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_range(mut self, window: TimeWindow) -> Self {
        self.time_range = window;
        self
    }

    pub fn category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the maximum item count (at least 1)
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }
}

/// arXiv subject areas the paper fetcher can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaperCategory {
    /// Union of every listed subject
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "cs.AI")]
    ArtificialIntelligence,
    #[serde(rename = "cs.CL")]
    ComputationLanguage,
    #[serde(rename = "cs.CV")]
    ComputerVision,
    #[serde(rename = "cs.LG")]
    MachineLearning,
    #[serde(rename = "cs.MA")]
    MultiagentSystems,
}

impl PaperCategory {
    /// Every concrete subject (excludes `All`)
    pub const SUBJECTS: [PaperCategory; 5] = [
        PaperCategory::ArtificialIntelligence,
        PaperCategory::ComputationLanguage,
        PaperCategory::ComputerVision,
        PaperCategory::MachineLearning,
        PaperCategory::MultiagentSystems,
    ];

    /// arXiv subject code, or `all`
    pub fn id(&self) -> &'static str {
        match self {
            PaperCategory::All => "all",
            PaperCategory::ArtificialIntelligence => "cs.AI",
            PaperCategory::ComputationLanguage => "cs.CL",
            PaperCategory::ComputerVision => "cs.CV",
            PaperCategory::MachineLearning => "cs.LG",
            PaperCategory::MultiagentSystems => "cs.MA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaperCategory::All => "All AI Subjects",
            PaperCategory::ArtificialIntelligence => "Artificial Intelligence",
            PaperCategory::ComputationLanguage => "Computation and Language",
            PaperCategory::ComputerVision => "Computer Vision",
            PaperCategory::MachineLearning => "Machine Learning",
            PaperCategory::MultiagentSystems => "Multiagent Systems",
        }
    }

    /// Subjects covered by this selection
    pub fn subjects(&self) -> Vec<PaperCategory> {
        match self {
            PaperCategory::All => Self::SUBJECTS.to_vec(),
            other => vec![*other],
        }
    }
}

impl std::fmt::Display for PaperCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for PaperCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("all") {
            return Ok(PaperCategory::All);
        }
        Self::SUBJECTS
            .iter()
            .find(|c| c.id().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| {
                ParseEnumError::new(
                    "paper category",
                    s,
                    "all, cs.AI, cs.CL, cs.CV, cs.LG, cs.MA",
                )
            })
    }
}

/// Parameters for `fetch_papers`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperRequest {
    pub category: PaperCategory,
    pub max_results: usize,
}

impl Default for PaperRequest {
    fn default() -> Self {
        Self {
            category: PaperCategory::All,
            max_results: PaperRequest::DEFAULT_MAX_RESULTS,
        }
    }
}

impl PaperRequest {
    pub const DEFAULT_MAX_RESULTS: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: PaperCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the result count (at least 1)
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }
}

/// A data section that may appear in the daily report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailySection {
    Research,
    News,
    Gaming,
    Papers,
}

impl DailySection {
    pub fn id(&self) -> &'static str {
        match self {
            DailySection::Research => "research",
            DailySection::News => "news",
            DailySection::Gaming => "gaming",
            DailySection::Papers => "papers",
        }
    }

    /// The feed category backing this section, if it is a news section
    pub fn feed_category(&self) -> Option<Category> {
        match self {
            DailySection::Research => Some(Category::Research),
            DailySection::News => Some(Category::News),
            DailySection::Gaming => Some(Category::Gaming),
            DailySection::Papers => None,
        }
    }
}

impl FromStr for DailySection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "papers" | "arxiv" => Ok(DailySection::Papers),
            other => other
                .parse::<Category>()
                .map(|c| match c {
                    Category::Research => DailySection::Research,
                    Category::News => DailySection::News,
                    Category::Gaming => DailySection::Gaming,
                })
                .map_err(|_| {
                    ParseEnumError::new("daily section", s, "research, news, gaming, papers")
                }),
        }
    }
}

/// Parameters for `build_daily_report`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRequest {
    include: Vec<DailySection>,
}

impl Default for DailyRequest {
    fn default() -> Self {
        Self {
            include: vec![
                DailySection::Research,
                DailySection::News,
                DailySection::Gaming,
            ],
        }
    }
}

impl DailyRequest {
    /// Build from an ordered list; later repeats of a section are dropped.
    /// An empty list falls back to the default sections.
    pub fn new(sections: impl IntoIterator<Item = DailySection>) -> Self {
        let mut include: Vec<DailySection> = Vec::new();
        for section in sections {
            if !include.contains(&section) {
                include.push(section);
            }
        }
        if include.is_empty() {
            return Self::default();
        }
        Self { include }
    }

    pub fn sections(&self) -> &[DailySection] {
        &self.include
    }
}

/// Parameters for `build_weekly_report`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyRequest {
    focus_areas: Vec<String>,
}

impl Default for WeeklyRequest {
    fn default() -> Self {
        Self {
            focus_areas: ["gaming", "generative-ai", "multimodal"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl WeeklyRequest {
    /// Build from free-text labels; blank labels are ignored and an empty
    /// list falls back to the default focus areas.
    pub fn new<S: AsRef<str>>(focus_areas: impl IntoIterator<Item = S>) -> Self {
        let focus_areas: Vec<String> = focus_areas
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if focus_areas.is_empty() {
            return Self::default();
        }
        Self { focus_areas }
    }

    pub fn focus_areas(&self) -> &[String] {
        &self.focus_areas
    }
}
