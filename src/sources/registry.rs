//! Registry of the feed sources the orchestrator may fetch from.

use std::collections::HashSet;

use crate::models::{Category, CategoryFilter, FeedSource};

use super::SourceError;

/// Immutable, ordered list of feed sources.
///
/// Registration order is significant: the orchestrator merges results in
/// this order, so items from earlier sources win ties and deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRegistry {
    sources: Vec<FeedSource>,
}

impl FeedRegistry {
    /// Create a registry from explicit sources, rejecting blank names or
    /// endpoints and duplicate names
    pub fn new(sources: Vec<FeedSource>) -> Result<Self, SourceError> {
        let mut registry = Self {
            sources: Vec::with_capacity(sources.len()),
        };
        for source in sources {
            registry.register(source)?;
        }
        Ok(registry)
    }

    /// The built-in AI news, research and gaming feeds
    pub fn builtin() -> Self {
        let sources = [
            // Research labs
            ("OpenAI News", "https://openai.com/news/rss.xml", Category::Research),
            ("Google DeepMind", "https://deepmind.google/blog/rss.xml", Category::Research),
            ("Google Research", "https://research.google/blog/rss/", Category::Research),
            ("Hugging Face Blog", "https://huggingface.co/blog/feed.xml", Category::Research),
            ("BAIR Blog", "https://bair.berkeley.edu/blog/feed.xml", Category::Research),
            // Industry news
            (
                "MIT Technology Review",
                "https://www.technologyreview.com/topic/artificial-intelligence/feed",
                Category::News,
            ),
            (
                "The Verge AI",
                "https://www.theverge.com/rss/ai-artificial-intelligence/index.xml",
                Category::News,
            ),
            (
                "TechCrunch AI",
                "https://techcrunch.com/category/artificial-intelligence/feed/",
                Category::News,
            ),
            ("VentureBeat AI", "https://venturebeat.com/category/ai/feed/", Category::News),
            // Games industry
            ("Game Developer", "https://www.gamedeveloper.com/rss.xml", Category::Gaming),
            ("GamesIndustry.biz", "https://www.gamesindustry.biz/feed", Category::Gaming),
            ("Polygon", "https://www.polygon.com/rss/index.xml", Category::Gaming),
        ];

        Self {
            sources: sources
                .into_iter()
                .map(|(name, url, category)| FeedSource::new(name, url, category))
                .collect(),
        }
    }

    /// Append a source
    pub fn register(&mut self, source: FeedSource) -> Result<(), SourceError> {
        if source.name.trim().is_empty() {
            return Err(SourceError::InvalidRequest(
                "Feed source name must not be empty".to_string(),
            ));
        }
        if source.endpoint.trim().is_empty() {
            return Err(SourceError::InvalidRequest(format!(
                "Feed source '{}' has no endpoint",
                source.name
            )));
        }
        if self.has(&source.name) {
            return Err(SourceError::InvalidRequest(format!(
                "Feed source '{}' is registered twice",
                source.name
            )));
        }
        self.sources.push(source);
        Ok(())
    }

    /// Get a source by name
    pub fn get(&self, name: &str) -> Option<&FeedSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// All sources in registration order
    pub fn all(&self) -> &[FeedSource] {
        &self.sources
    }

    /// Sources passing the category filter, in registration order
    pub fn matching(&self, filter: CategoryFilter) -> Vec<&FeedSource> {
        self.sources
            .iter()
            .filter(|s| filter.matches(s.category))
            .collect()
    }

    /// Categories that have at least one source
    pub fn categories(&self) -> Vec<Category> {
        let present: HashSet<Category> = self.sources.iter().map(|s| s.category).collect();
        Category::ALL
            .into_iter()
            .filter(|c| present.contains(c))
            .collect()
    }

    /// Check if a source exists
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for FeedRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
