//! Core data models for feed sources, normalized items, requests and reports.

mod item;
mod report;
mod request;

pub use item::{Category, CategoryFilter, FeedSource, NormalizedItem, RawItem};
pub use report::{Report, ReportSection, SectionKind};
pub use request::{
    DailyRequest, DailySection, NewsRequest, PaperCategory, PaperRequest, TimeWindow,
    WeeklyRequest,
};

/// Error returned when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}
