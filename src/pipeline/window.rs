//! Time-window filtering and newest-first ordering.
//!
//! Pure functions: the caller supplies `now`, so the same input always gives
//! the same output and re-filtering a filtered result is a no-op.

use chrono::{DateTime, Utc};

use crate::models::{NormalizedItem, TimeWindow};

/// Earliest publish time still inside the window
pub fn cutoff(window: TimeWindow, now: DateTime<Utc>) -> DateTime<Utc> {
    now - window.duration()
}

/// Sort newest first. The sort is stable, so items with equal timestamps
/// keep their incoming order.
pub fn sort_newest_first(items: &mut [NormalizedItem]) {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Keep items published at or after `now - window`, newest first, at most `limit`
pub fn filter_and_sort(
    items: Vec<NormalizedItem>,
    window: TimeWindow,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<NormalizedItem> {
    let cutoff = cutoff(window, now);
    let mut kept: Vec<NormalizedItem> = items
        .into_iter()
        .filter(|item| item.published_at >= cutoff)
        .collect();

    sort_newest_first(&mut kept);
    kept.truncate(limit);
    kept
}
