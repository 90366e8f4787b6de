//! Mapping raw entries onto [`NormalizedItem`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;

use crate::models::{FeedSource, NormalizedItem, RawItem};
use crate::utils::{collapse_whitespace, strip_html, truncate, Clock};

/// Title used when an entry has none
pub const UNTITLED: &str = "Untitled";

/// Summary cap for news items
pub const NEWS_SUMMARY_CAP: usize = 200;

/// Summary cap for paper abstracts
pub const PAPER_SUMMARY_CAP: usize = 300;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Fills defaults and bounds lengths; never fails on a malformed entry.
#[derive(Debug, Clone)]
pub struct Normalizer {
    clock: Arc<dyn Clock>,
    summary_cap: usize,
}

impl Normalizer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            summary_cap: NEWS_SUMMARY_CAP,
        }
    }

    /// Set the maximum summary length in characters
    pub fn summary_cap(mut self, cap: usize) -> Self {
        self.summary_cap = cap;
        self
    }

    /// Normalize one entry.
    ///
    /// Returns `None` only for an entry with no usable field at all. Missing
    /// or unparseable dates are backfilled with the clock's current time.
    pub fn normalize(&self, raw: &RawItem, source: &str, category: &str) -> Option<NormalizedItem> {
        if raw.is_empty() {
            return None;
        }

        let title = raw
            .title
            .as_deref()
            .map(strip_html)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let published_at = raw
            .published
            .as_deref()
            .and_then(parse_published)
            .unwrap_or_else(|| self.clock.now());

        let summary = raw
            .summary
            .as_deref()
            .map(|s| truncate(&strip_html(s), self.summary_cap))
            .filter(|s| !s.is_empty());

        let author = raw
            .author
            .as_deref()
            .map(collapse_whitespace)
            .filter(|a| !a.is_empty());

        Some(NormalizedItem {
            title,
            link: raw.link.as_deref().map(str::trim).unwrap_or_default().to_string(),
            published_at,
            source: source.to_string(),
            category: category.to_string(),
            summary,
            author,
        })
    }

    /// Normalize every entry a feed source returned, skipping empty ones
    pub fn normalize_all(&self, raws: &[RawItem], source: &FeedSource) -> Vec<NormalizedItem> {
        raws.iter()
            .filter_map(|raw| self.normalize(raw, &source.name, source.category.id()))
            .collect()
    }
}

/// Parse a publish date in any of the formats feeds commonly use.
///
/// Naive forms are interpreted as UTC.
pub fn parse_published(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::utils::{FixedClock, SystemClock};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(FixedClock::new(fixed_now())))
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let raw = RawItem {
            summary: Some("Only a summary".to_string()),
            ..Default::default()
        };

        let item = normalizer().normalize(&raw, "Feed", "news").unwrap();
        assert_eq!(item.title, UNTITLED);
        assert_eq!(item.link, "");
        assert_eq!(item.published_at, fixed_now());
        assert_eq!(item.summary.as_deref(), Some("Only a summary"));
        assert!(item.author.is_none());
    }

    #[test]
    fn test_missing_date_uses_current_time() {
        let raw = RawItem {
            title: Some("Undated".to_string()),
            ..Default::default()
        };

        let before = Utc::now();
        let item = Normalizer::new(Arc::new(SystemClock))
            .normalize(&raw, "Feed", "news")
            .unwrap();
        let after = Utc::now();
        assert!(item.published_at >= before && item.published_at <= after);
    }

    #[test]
    fn test_malformed_date_falls_back_to_now() {
        let raw = RawItem {
            title: Some("Bad date".to_string()),
            published: Some("sometime last week".to_string()),
            ..Default::default()
        };
        let item = normalizer().normalize(&raw, "Feed", "news").unwrap();
        assert_eq!(item.published_at, fixed_now());
    }

    #[test]
    fn test_empty_entry_is_skipped() {
        assert!(normalizer()
            .normalize(&RawItem::default(), "Feed", "news")
            .is_none());
    }

    #[test]
    fn test_summary_is_cleaned_and_capped() {
        let raw = RawItem {
            title: Some("  Model   &amp; benchmark\n".to_string()),
            summary: Some(format!("<p>{}</p>", "x".repeat(500))),
            author: Some(" Grace   Hopper ".to_string()),
            ..Default::default()
        };

        let item = normalizer().normalize(&raw, "Feed", "research").unwrap();
        assert_eq!(item.title, "Model & benchmark");
        assert_eq!(item.author.as_deref(), Some("Grace Hopper"));
        assert_eq!(item.summary.as_ref().unwrap().chars().count(), NEWS_SUMMARY_CAP);

        let paper = normalizer()
            .summary_cap(PAPER_SUMMARY_CAP)
            .normalize(&raw, "arXiv", "cs.AI")
            .unwrap();
        assert_eq!(paper.summary.unwrap().chars().count(), PAPER_SUMMARY_CAP);

        let bare = normalizer()
            .summary_cap(0)
            .normalize(&raw, "Feed", "research")
            .unwrap();
        assert!(bare.summary.is_none());
    }

    #[test]
    fn test_normalize_all_tags_source_and_category() {
        let source = FeedSource::new("Studio", "https://studio.example/feed", Category::Gaming);
        let raws = vec![
            RawItem {
                title: Some("One".to_string()),
                ..Default::default()
            },
            RawItem::default(),
            RawItem {
                title: Some("Two".to_string()),
                ..Default::default()
            },
        ];

        let items = normalizer().normalize_all(&raws, &source);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.source == "Studio" && i.category == "gaming"));
    }

    #[test]
    fn test_parse_published_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 10, 15, 10, 0, 0).unwrap();
        assert_eq!(parse_published("2026-10-15T10:00:00Z"), Some(expected));
        assert_eq!(parse_published("2026-10-15T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_published("Thu, 15 Oct 2026 10:00:00 GMT"), Some(expected));
        assert_eq!(parse_published("2026-10-15 10:00:00"), Some(expected));
        assert_eq!(parse_published("2026-10-15T10:00:00"), Some(expected));
        assert_eq!(
            parse_published("2026-10-15"),
            Some(Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_published(""), None);
        assert_eq!(parse_published("yesterday"), None);
    }
}
