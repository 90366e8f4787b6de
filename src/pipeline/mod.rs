//! The aggregation pipeline: fetch orchestration, normalization and
//! time-window filtering.
//!
//! ```text
//! FeedRegistry ─▶ FetchOrchestrator ─▶ Normalizer ─▶ window::filter_and_sort ─▶ report
//! PaperSource  ─▶ PaperFetcher      ─▶ Normalizer ─────────────────────────────▶ report
//! ```
//!
//! Only the per-source fetches and the paper request suspend; everything
//! after the fan-in barrier is synchronous.

mod normalize;
mod orchestrator;
mod papers;
pub mod window;

pub use normalize::{parse_published, Normalizer, NEWS_SUMMARY_CAP, PAPER_SUMMARY_CAP, UNTITLED};
pub use orchestrator::{
    FetchOrchestrator, FetchOutcome, OrchestratorSettings, SourceFailure, DEFAULT_FETCH_TIMEOUT,
    DEFAULT_MAX_CONCURRENT,
};
pub use papers::{PaperFetcher, DEFAULT_PAPER_TIMEOUT};

use crate::sources::SourceError;

/// Caller-visible failure of an operation whose only upstream failed
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed: {upstream} request failed: {source}")]
pub struct FetchError {
    /// Operation that failed (e.g. `fetch_papers`)
    pub operation: &'static str,
    /// Name of the upstream that was queried
    pub upstream: String,
    #[source]
    pub source: SourceError,
}

impl FetchError {
    pub fn new(operation: &'static str, upstream: &str, source: SourceError) -> Self {
        Self {
            operation,
            upstream: upstream.to_string(),
            source,
        }
    }
}
