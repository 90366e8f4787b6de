//! Report documents produced by the assembler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NormalizedItem;

/// Whether a section carries aggregated data or a narrative placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Data,
    /// Left for a human or downstream model to complete
    Placeholder,
}

/// One independently rendered part of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub kind: SectionKind,
    pub items: Vec<NormalizedItem>,
    /// Diagnostic line (e.g. unavailable sources), rendered under the heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub rendered_body: String,
}

impl ReportSection {
    pub fn is_data(&self) -> bool {
        self.kind == SectionKind::Data
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The document returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<ReportSection>,
}

/// Separator placed between rendered sections
pub(crate) const SECTION_RULE: &str = "\n\n---\n\n";

impl Report {
    /// Sections that carry aggregated items, in report order
    pub fn data_sections(&self) -> impl Iterator<Item = &ReportSection> {
        self.sections.iter().filter(|s| s.is_data())
    }

    /// Look up a section by its heading
    pub fn section(&self, heading: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    /// Total number of items across data sections
    pub fn item_count(&self) -> usize {
        self.data_sections().map(ReportSection::len).sum()
    }

    /// Render the whole document as Markdown
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "# {}\n\n*Generated: {}*\n\n",
            self.title,
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        );
        let bodies: Vec<&str> = self
            .sections
            .iter()
            .map(|s| s.rendered_body.trim_end())
            .collect();
        out.push_str(&bodies.join(SECTION_RULE));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn section(heading: &str, kind: SectionKind) -> ReportSection {
        ReportSection {
            heading: heading.to_string(),
            kind,
            items: Vec::new(),
            note: None,
            rendered_body: format!("## {}\n", heading),
        }
    }

    #[test]
    fn test_data_sections_skip_placeholders() {
        let report = Report {
            title: "Daily".to_string(),
            generated_at: Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap(),
            sections: vec![
                section("News", SectionKind::Data),
                section("Insights", SectionKind::Placeholder),
                section("Gaming", SectionKind::Data),
            ],
        };

        let headings: Vec<&str> = report.data_sections().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["News", "Gaming"]);
        assert!(report.section("Insights").is_some());
        assert_eq!(report.item_count(), 0);
    }

    #[test]
    fn test_to_markdown_joins_sections_with_rules() {
        let report = Report {
            title: "Weekly".to_string(),
            generated_at: Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap(),
            sections: vec![
                section("A", SectionKind::Data),
                section("B", SectionKind::Data),
            ],
        };

        let markdown = report.to_markdown();
        assert!(markdown.starts_with("# Weekly\n\n*Generated: 2026-10-16 08:30 UTC*"));
        assert!(markdown.contains("## A\n\n---\n\n## B\n"));
    }
}
