//! MCP (Model Context Protocol) implementation.

mod handlers;
pub mod server;
mod tools;

pub use handlers::{
    report_to_json, DailyReportHandler, FetchNewsHandler, FetchPapersHandler, WeeklyReportHandler,
};
pub use server::McpServer;
pub use tools::{Tool, ToolHandler, ToolRegistry};
