//! # Time-window policy for content-list queries.
//!
//! The upstream API rejects windows wider than 24 hours, windows starting
//! more than 7 days in the past, and degenerate windows. [`time_window`]
//! massages a stored cursor and a sweep's request time into bounds the
//! API will accept; the content lister applies it on every iteration of
//! its pagination loop, walking stale state forward one day at a time
//! until the window reaches the request time.

use chrono::{DateTime, Duration, Utc};

use crate::params::{interval_one_day, interval_one_week};

/// Derives the `(start, end)` bounds of the next content-list query.
///
/// `start` is the stored `lastRequestTime` cursor (`None` on a fresh
/// store), `end` the bound carried over from the previous loop
/// iteration. Windows produced along the pagination loop satisfy
/// `0 < end - start <= 24h`, `start >= end - 7d` and
/// `end <= request_time`.
pub(crate) fn time_window(
    look_behind: Duration,
    request_time: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let mut end = if start == Some(end) { request_time } else { end };

    let is_base = match start {
        None => true,
        Some(start) => start > end || end - start < look_behind,
    };
    let mut start = start.unwrap_or(end);

    if is_base {
        // no usable cursor, or one too close to the end bound:
        // fall back to the configured look-behind
        start = end - look_behind;
    } else if end < request_time {
        // the end bound lags the sweep; keep the window untouched, the
        // pagination loop derives fresh bounds on its next pass
    } else if end - start > interval_one_week() {
        // cannot query the API further than one week in the past
        start = end - interval_one_week();
        end = start + interval_one_day();
    } else if end - start > interval_one_day() {
        // cannot query the API for more than a 24 hour interval
        end = start + interval_one_day();
    }

    if end > request_time {
        end = request_time;
    }
    (start, end)
}
