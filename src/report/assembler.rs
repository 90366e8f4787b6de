//! Pure rendering of prepared items into report sections.

use chrono::{DateTime, Utc};

use crate::models::{NormalizedItem, Report, ReportSection, SectionKind};

/// Format used for item timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Placed between item blocks inside a section
pub const ITEM_DELIMITER: &str = "\n\n";

/// Line rendered for a data section with no items
pub const EMPTY_SECTION_TEXT: &str = "_No items found._";

/// Builds sections and reports from already fetched, filtered and sorted
/// items. Performs no I/O and never reorders items or sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    /// A data section; an empty item list still yields a section
    pub fn data_section(
        heading: impl Into<String>,
        items: Vec<NormalizedItem>,
        note: Option<String>,
    ) -> ReportSection {
        let heading = heading.into();
        let rendered_body = render_data_body(&heading, &items, note.as_deref());
        ReportSection {
            heading,
            kind: SectionKind::Data,
            items,
            note,
            rendered_body,
        }
    }

    /// A narrative section explicitly left for a human or downstream model
    pub fn placeholder_section(heading: impl Into<String>, prompt: &str) -> ReportSection {
        let heading = heading.into();
        let rendered_body = format!(
            "## {}\n\n> **To be completed:** {}\n> _This section is not generated from feed data._\n",
            heading, prompt
        );
        ReportSection {
            heading,
            kind: SectionKind::Placeholder,
            items: Vec::new(),
            note: None,
            rendered_body,
        }
    }

    /// Assemble sections into a report, keeping the given order
    pub fn assemble(
        title: impl Into<String>,
        generated_at: DateTime<Utc>,
        sections: Vec<ReportSection>,
    ) -> Report {
        Report {
            title: title.into(),
            generated_at,
            sections,
        }
    }
}

fn count_line(count: usize) -> String {
    match count {
        1 => "*1 item*".to_string(),
        n => format!("*{} items*", n),
    }
}

fn render_data_body(heading: &str, items: &[NormalizedItem], note: Option<&str>) -> String {
    let mut body = format!("## {}\n\n{}\n", heading, count_line(items.len()));
    if let Some(note) = note {
        body.push_str(&format!("\n*Note: {}*\n", note));
    }

    if items.is_empty() {
        body.push_str(&format!("\n{}\n", EMPTY_SECTION_TEXT));
        return body;
    }

    let blocks: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| render_item(i + 1, item))
        .collect();
    body.push('\n');
    body.push_str(&blocks.join(ITEM_DELIMITER));
    body.push('\n');
    body
}

/// Render one item block
pub fn render_item(position: usize, item: &NormalizedItem) -> String {
    let mut lines = vec![
        format!("### {}. {}", position, item.title),
        String::new(),
        format!("- **Source**: {}", item.source),
        format!("- **Published**: {}", item.published_at.format(TIMESTAMP_FORMAT)),
    ];
    if let Some(author) = &item.author {
        lines.push(format!("- **Author**: {}", author));
    }
    if !item.link.is_empty() {
        lines.push(format!("- **Link**: {}", item.link));
    }
    if let Some(summary) = &item.summary {
        lines.push(String::new());
        lines.push(format!("> {}", summary));
    }
    lines.join("\n")
}
