//! # Query-parameter builder for Management Activity API calls.
//!
//! [`QueryParams`] produces the exact wire form the upstream expects and
//! enforces its temporal rules before a request ever leaves the process:
//! start/end must come as a pair, the interval must be positive and at
//! most 24 hours wide, and it may not begin more than 7 days in the past.
//!
//! Datetime parameters use the `YYYY-MM-DDTHH:MM` layout, no seconds and
//! no timezone designator.

use chrono::{DateTime, Duration, Utc};

use crate::content_type::ContentType;
use crate::error::ApiError;

/// Layout of `startTime`/`endTime` request parameters.
pub(crate) const REQUEST_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub(crate) fn interval_one_day() -> Duration {
    Duration::minutes(1440)
}

pub(crate) fn interval_one_week() -> Duration {
    interval_one_day() * 7
}

/// Parses the `contentCreated` field of a content descriptor
/// (RFC 3339 with optional fractional seconds, e.g.
/// `2024-03-05T07:09:12.345Z`).
pub(crate) fn parse_content_created(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|t| t.with_timezone(&Utc))
}

/// Ordered set of query parameters for one API call.
#[derive(Clone, Debug, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `PublisherIdentifier`, used upstream to group queries for
    /// quota accounting. Empty identifiers are skipped.
    pub fn publisher_identifier(&mut self, id: &str) {
        if !id.is_empty() {
            self.set("PublisherIdentifier", id.to_string());
        }
    }

    /// Adds the mandatory `contentType` parameter in canonical form.
    pub fn content_type(&mut self, ct: Option<ContentType>) -> Result<(), ApiError> {
        let ct = ct.ok_or(ApiError::ContentTypeRequired)?;
        self.set("contentType", ct.as_str().to_string());
        Ok(())
    }

    /// Adds `startTime`/`endTime` after validating the interval rules.
    /// Passing neither is valid and adds nothing (the API then serves
    /// its default 24-hour window).
    pub fn start_end_time(
        &mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<(), ApiError> {
        let (start, end) = match (start, end) {
            (None, None) => return Ok(()),
            (Some(start), Some(end)) => (start, end),
            _ => return Err(ApiError::IntervalMismatch),
        };

        let interval = end - start;
        if interval <= Duration::zero() {
            return Err(ApiError::IntervalNegative);
        }
        if interval > interval_one_day() {
            return Err(ApiError::IntervalDay);
        }
        if start < Utc::now() - interval_one_week() {
            return Err(ApiError::IntervalWeek);
        }
        self.set("startTime", start.format(REQUEST_DATETIME_FORMAT).to_string());
        self.set("endTime", end.format(REQUEST_DATETIME_FORMAT).to_string());
        Ok(())
    }

    /// Forwards a pagination cursor verbatim, replacing any prior one.
    pub fn next_page(&mut self, cursor: &str) {
        self.set("nextpage", cursor.to_string());
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    fn set(&mut self, key: &str, value: String) {
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.push((key.to_string(), value));
    }
}
