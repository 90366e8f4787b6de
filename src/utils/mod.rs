//! Utility modules supporting the aggregation pipeline.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts and a user agent
//! - [`Clock`]: injectable time source ([`SystemClock`], [`FixedClock`])
//! - [`truncate`], [`strip_html`], [`collapse_whitespace`]: text cleanup
//! - [`deduplicate_items`]: collapse the same story syndicated by several feeds
//!
//! # Truncation
//!
//! ```rust
//! use ai_news_mcp::utils::truncate;
//!
//! let short = truncate("A very long summary of a new model release", 16);
//! assert!(short.chars().count() <= 16);
//! assert_eq!(truncate(&short, 16), short);
//! ```

mod clock;
mod dedup;
mod http;
mod text;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dedup::{deduplicate_items, title_key};
pub use http::{HttpClient, DEFAULT_USER_AGENT};
pub use text::{collapse_whitespace, strip_html, truncate, ELLIPSIS};
