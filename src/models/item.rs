//! Feed sources and the items that flow through the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ParseEnumError;

/// The closed set of categories a feed source can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Research,
    News,
    Gaming,
}

impl Category {
    /// Every category, in template order
    pub const ALL: [Category; 3] = [Category::Research, Category::News, Category::Gaming];

    /// Returns the category identifier (used in tool arguments and config)
    pub fn id(&self) -> &'static str {
        match self {
            Category::Research => "research",
            Category::News => "news",
            Category::Gaming => "gaming",
        }
    }

    /// Returns the display name used in report headings
    pub fn name(&self) -> &'static str {
        match self {
            Category::Research => "Research Labs",
            Category::News => "Industry News",
            Category::Gaming => "Gaming & AI",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "research" => Ok(Category::Research),
            "news" => Ok(Category::News),
            "gaming" => Ok(Category::Gaming),
            _ => Err(ParseEnumError::new("category", s, "research, news, gaming")),
        }
    }
}

/// Category selector: every category, or exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Whether a source of the given category passes this filter
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(c) => c.id(),
        }
    }

    /// Display name used in report headings
    pub fn name(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All Categories",
            CategoryFilter::Only(c) => c.name(),
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<Category>()
            .map(CategoryFilter::Only)
            .map_err(|_| ParseEnumError::new("category", s, "all, research, news, gaming"))
    }
}

/// A named, categorized remote feed endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Unique name, shown as the item source in reports
    pub name: String,

    /// Feed URL (RSS or Atom)
    #[serde(alias = "url")]
    pub endpoint: String,

    pub category: Category,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            category,
        }
    }
}

/// An entry as an endpoint delivered it, before defaulting and truncation.
///
/// Every field is optional; dates are kept as the raw string so that
/// normalization decides how to interpret them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub summary: Option<String>,
    pub author: Option<String>,
    /// Upstream category/tag, if the entry carries one
    pub category: Option<String>,
}

impl RawItem {
    /// An entry with no usable field at all
    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.link,
            &self.published,
            &self.summary,
            &self.author,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

/// The common record every news or paper entry is mapped into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    /// Never empty; a placeholder is used when the source omits it
    pub title: String,

    /// Empty when the source omits it
    pub link: String,

    pub published_at: DateTime<Utc>,

    /// Name of the source that produced the item
    pub source: String,

    /// Category label (feed category id, or arXiv subject for papers)
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_ids() {
        for category in Category::ALL {
            assert_eq!(category.id().parse::<Category>().unwrap(), category);
        }
        assert_eq!(" Gaming ".parse::<Category>().unwrap(), Category::Gaming);
        assert!("papers".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_filter() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        let news: CategoryFilter = "news".parse().unwrap();
        assert!(news.matches(Category::News));
        assert!(!news.matches(Category::Gaming));
        assert!(CategoryFilter::All.matches(Category::Research));

        let err = "sports".parse::<CategoryFilter>().unwrap_err();
        assert!(err.to_string().contains("sports"));
    }

    #[test]
    fn test_raw_item_is_empty() {
        assert!(RawItem::default().is_empty());
        assert!(RawItem {
            title: Some("   ".to_string()),
            ..Default::default()
        }
        .is_empty());
        assert!(!RawItem {
            link: Some("https://example.com/a".to_string()),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_feed_source_accepts_url_alias() {
        let source: FeedSource =
            toml::from_str("name = \"Blog\"\nurl = \"https://example.com/feed\"\ncategory = \"research\"")
                .unwrap();
        assert_eq!(source.endpoint, "https://example.com/feed");
        assert_eq!(source.category, Category::Research);
    }
}
