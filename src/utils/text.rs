//! Text cleanup helpers applied during normalization.

use regex::Regex;
use std::sync::OnceLock;

/// Suffix appended to truncated text
pub const ELLIPSIS: &str = "...";

static TAG_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

/// Shorten `text` to at most `cap` characters.
///
/// Text already within the cap is returned unchanged, which makes the
/// operation idempotent. Longer text is cut on a character boundary and
/// ends with [`ELLIPSIS`].
pub fn truncate(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    if cap <= ELLIPSIS.len() {
        return text.chars().take(cap).collect();
    }

    let kept: String = text.chars().take(cap - ELLIPSIS.len()).collect();
    format!("{}{}", kept.trim_end(), ELLIPSIS)
}

/// Collapse runs of whitespace (including newlines) into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove markup tags, decode the common entities and collapse whitespace
pub fn strip_html(text: &str) -> String {
    let without_tags = match TAG_PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").ok()) {
        Some(re) => re.replace_all(text, " ").into_owned(),
        None => text.to_string(),
    };

    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    collapse_whitespace(&decoded)
}
