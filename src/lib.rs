//! # AI News MCP
//!
//! A Model Context Protocol (MCP) server that aggregates RSS/Atom news feeds and
//! arXiv listings into Markdown reports.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (FeedSource, NormalizedItem, Report, requests)
//! - [`sources`]: Feed registry, the per-source fetch seam and the arXiv upstream
//! - [`pipeline`]: Fetch orchestration, normalization, time-window filtering
//! - [`report`]: Report assembly, composite daily/weekly builders and the service facade
//! - [`mcp`]: MCP protocol implementation and server
//! - [`utils`]: HTTP client, clock, text helpers and deduplication
//! - [`config`]: Configuration management

pub mod config;
pub mod mcp;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::{NormalizedItem, Report};
pub use report::NewsService;
pub use sources::{FeedFetcher, FeedRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
