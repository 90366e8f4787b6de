//! Report assembly and the public operations.
//!
//! [`ReportAssembler`] turns prepared items into Markdown sections without
//! touching the network. [`ReportBuilder`] owns the daily and weekly
//! templates. [`NewsService`] is the facade the CLI and MCP tools call.

mod assembler;
mod builder;
mod service;

pub use assembler::{render_item, ReportAssembler, EMPTY_SECTION_TEXT, ITEM_DELIMITER, TIMESTAMP_FORMAT};
pub use builder::{ReportBuilder, ReportLimits, PAPERS_HEADING, ROUNDUP_HEADING};
pub use service::NewsService;
