//! Tool handlers that turn MCP arguments into service calls.

use std::str::FromStr;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::models::{
    CategoryFilter, DailyRequest, DailySection, NewsRequest, PaperCategory, PaperRequest, Report,
    TimeWindow, WeeklyRequest,
};
use crate::report::NewsService;

use super::tools::ToolHandler;

fn parse_enum<T>(tool: &str, args: &Value, key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s
            .parse()
            .map(Some)
            .map_err(|e| format!("{}: {}", tool, e)),
        Some(other) => Err(format!("{}: '{}' must be a string, got {}", tool, key, other)),
    }
}

fn positive_int(tool: &str, args: &Value, key: &str) -> Result<Option<usize>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match value.as_u64() {
            Some(n) if n > 0 => Ok(Some(n as usize)),
            _ => Err(format!(
                "{}: '{}' must be a positive integer, got {}",
                tool, key, value
            )),
        },
    }
}

fn string_list(tool: &str, args: &Value, key: &str) -> Result<Vec<String>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("{}: '{}' must contain only strings", tool, key))
            })
            .collect(),
        Some(Value::String(s)) => Ok(s.split(',').map(|part| part.trim().to_string()).collect()),
        Some(other) => Err(format!("{}: '{}' must be an array of strings, got {}", tool, key, other)),
    }
}

/// JSON payload returned by every tool
pub fn report_to_json(report: &Report) -> Value {
    json!({
        "title": report.title,
        "generated_at": report.generated_at.to_rfc3339(),
        "item_count": report.item_count(),
        "sections": report.sections,
        "markdown": report.to_markdown(),
    })
}

/// Handler for `fetch_ai_news`
#[derive(Debug)]
pub struct FetchNewsHandler {
    pub service: Arc<NewsService>,
}

impl FetchNewsHandler {
    pub const NAME: &'static str = "fetch_ai_news";

    pub fn parse_request(args: &Value) -> Result<NewsRequest, String> {
        let mut request = NewsRequest::new();
        if let Some(window) = parse_enum::<TimeWindow>(Self::NAME, args, "time_range")? {
            request = request.time_range(window);
        }
        if let Some(category) = parse_enum::<CategoryFilter>(Self::NAME, args, "category")? {
            request = request.category(category);
        }
        if let Some(limit) = positive_int(Self::NAME, args, "limit")? {
            request = request.limit(limit);
        }
        Ok(request)
    }
}

#[async_trait::async_trait]
impl ToolHandler for FetchNewsHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let request = Self::parse_request(&args)?;
        let report = self.service.fetch_news(request).await;
        Ok(report_to_json(&report))
    }
}

/// Handler for `fetch_arxiv_papers`
#[derive(Debug)]
pub struct FetchPapersHandler {
    pub service: Arc<NewsService>,
}

impl FetchPapersHandler {
    pub const NAME: &'static str = "fetch_arxiv_papers";

    pub fn parse_request(args: &Value) -> Result<PaperRequest, String> {
        let mut request = PaperRequest::new();
        if let Some(category) = parse_enum::<PaperCategory>(Self::NAME, args, "category")? {
            request = request.category(category);
        }
        if let Some(max_results) = positive_int(Self::NAME, args, "max_results")? {
            request = request.max_results(max_results);
        }
        Ok(request)
    }
}

#[async_trait::async_trait]
impl ToolHandler for FetchPapersHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let request = Self::parse_request(&args)?;
        let report = self
            .service
            .fetch_papers(request)
            .await
            .map_err(|e| format!("{}: {}", Self::NAME, e))?;
        Ok(report_to_json(&report))
    }
}

/// Handler for `build_daily_report`
#[derive(Debug)]
pub struct DailyReportHandler {
    pub service: Arc<NewsService>,
}

impl DailyReportHandler {
    pub const NAME: &'static str = "build_daily_report";

    pub fn parse_request(args: &Value) -> Result<DailyRequest, String> {
        let sections = string_list(Self::NAME, args, "include_categories")?
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<DailySection>().map_err(|e| format!("{}: {}", Self::NAME, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DailyRequest::new(sections))
    }
}

#[async_trait::async_trait]
impl ToolHandler for DailyReportHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let request = Self::parse_request(&args)?;
        let report = self.service.build_daily_report(&request).await;
        Ok(report_to_json(&report))
    }
}

/// Handler for `build_weekly_report`
#[derive(Debug)]
pub struct WeeklyReportHandler {
    pub service: Arc<NewsService>,
}

impl WeeklyReportHandler {
    pub const NAME: &'static str = "build_weekly_report";

    pub fn parse_request(args: &Value) -> Result<WeeklyRequest, String> {
        Ok(WeeklyRequest::new(string_list(Self::NAME, args, "focus_areas")?))
    }
}

#[async_trait::async_trait]
impl ToolHandler for WeeklyReportHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let request = Self::parse_request(&args)?;
        let report = self.service.build_weekly_report(&request).await;
        Ok(report_to_json(&report))
    }
}
