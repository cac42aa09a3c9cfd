//! Incremental loading of timeline pages.
//!
//! [`TimelineController`] owns the accumulated record list for one query context
//! (namespace + optional date cutoff) and hands out at most one page request at
//! a time. Pages are anchored on the timestamp of the last record seen, so the
//! stream stays strictly descending across page boundaries.
//!
//! # State machine
//!
//! ```text
//!            begin_load                complete(Ok, full page)
//!   Idle ─────────────────▶ Loading ──────────────────────────▶ Idle
//!    ▲                        │  │
//!    │   complete(Err)        │  │ complete(Ok, short page)
//!    └────────────────────────┘  └──────────────────────────▶ Exhausted
//!
//!   reset: any state ─▶ Idle, generation + 1
//! ```
//!
//! Responses are tagged with the generation current when they were requested; a
//! response from before the latest [`TimelineController::reset`] is dropped.

pub mod controller;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

pub use controller::{Cursor, PageOutcome, PageRequest, PagerState, TimelineController};

/// Parse a date filter into an exclusive timestamp cutoff.
///
/// Accepts `YYYY-MM-DD` (midnight UTC of that day) or raw epoch seconds. Empty
/// input clears the filter.
pub fn parse_date_cutoff(input: &str) -> Result<Option<i64>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        if seconds < 0 {
            return Err(anyhow!("Date cutoff cannot be negative: {}", seconds));
        }
        return Ok(Some(seconds));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date: '{}' (expected YYYY-MM-DD)", input))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("Invalid date: '{}'", input))?
        .and_utc();
    Ok(Some(midnight.timestamp()))
}
