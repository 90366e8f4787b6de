//! Deduplication of items collected from several feeds.

use std::collections::HashSet;

use crate::models::NormalizedItem;
use crate::pipeline::UNTITLED;

/// Key under which two titles are considered the same story:
/// lowercase alphanumerics only, so punctuation and spacing differences
/// between syndicating feeds do not matter.
pub fn title_key(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Drop later occurrences of the same story, keeping the first one
pub fn deduplicate_items(items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut seen_titles: HashSet<String> = HashSet::new();
    let before = items.len();

    let unique: Vec<NormalizedItem> = items
        .into_iter()
        .filter(|item| {
            let link = item.link.trim().to_string();
            // Entries without a title share the placeholder; only their links count
            let key = if item.title == UNTITLED {
                String::new()
            } else {
                title_key(&item.title)
            };

            let link_seen = !link.is_empty() && seen_links.contains(&link);
            let title_seen = !key.is_empty() && seen_titles.contains(&key);
            if link_seen || title_seen {
                return false;
            }

            if !link.is_empty() {
                seen_links.insert(link);
            }
            if !key.is_empty() {
                seen_titles.insert(key);
            }
            true
        })
        .collect();

    if unique.len() < before {
        tracing::debug!("Removed {} duplicate items", before - unique.len());
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(title: &str, link: &str, source: &str) -> NormalizedItem {
        NormalizedItem {
            title: title.to_string(),
            link: link.to_string(),
            published_at: Utc::now(),
            source: source.to_string(),
            category: "news".to_string(),
            summary: None,
            author: None,
        }
    }

    #[test]
    fn test_title_key_ignores_case_and_punctuation() {
        assert_eq!(title_key("GPT-5 Released!"), title_key("gpt 5 released"));
        assert_ne!(title_key("Item 1"), title_key("Item 2"));
    }

    #[test]
    fn test_deduplicate_keeps_first_occurrence() {
        let items = vec![
            item("OpenAI ships new model", "https://a.example/1", "A"),
            item("Unrelated story", "https://b.example/2", "B"),
            item("OpenAI Ships New Model.", "https://c.example/3", "C"),
            item("Same link other title", "https://a.example/1", "D"),
        ];

        let unique = deduplicate_items(items);
        let sources: Vec<&str> = unique.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_links_do_not_collide() {
        let items = vec![item("First", "", "A"), item("Second", "", "B")];
        assert_eq!(deduplicate_items(items).len(), 2);
    }

    #[test]
    fn test_placeholder_titles_do_not_collide() {
        let items = vec![
            item(UNTITLED, "https://x.example/1", "A"),
            item(UNTITLED, "https://x.example/2", "B"),
            item(UNTITLED, "https://x.example/1", "C"),
        ];
        let sources: Vec<String> = deduplicate_items(items).into_iter().map(|i| i.source).collect();
        assert_eq!(sources, vec!["A", "B"]);
    }
}
