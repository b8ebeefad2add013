//! # Error types used by the audit feed client and watcher.
//!
//! This module defines four error enums:
//!
//! - [`WatchError`] errors surfaced by the watcher itself (construction
//!   and the terminal handler failure).
//! - [`ApiError`] errors raised while building or performing upstream
//!   API calls.
//! - [`HandlerError`] errors raised while emitting records.
//! - [`StateError`] errors raised while reading or writing the persisted
//!   watcher state.
//!
//! [`ApiError`] and [`WatchError`] provide `as_label` helpers for
//! logs/metrics; [`ApiError`] additionally exposes `is_retryable()`.

use thiserror::Error;

/// # Errors produced by the subscription watcher.
///
/// Transient upstream failures never surface here; they are logged at the
/// pipeline stage where they occur and retried on the next tick.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WatchError {
    /// The watcher configuration was rejected at construction.
    #[error("invalid watcher config: {reason}")]
    InvalidConfig {
        /// Human-readable reason for the rejection.
        reason: String,
    },
    /// The record handler returned a terminal failure.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl WatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            WatchError::InvalidConfig { .. } => "watch_invalid_config",
            WatchError::Handler(_) => "watch_handler",
        }
    }
}

/// # Errors produced while talking to the Management Activity API.
///
/// The first group mirrors the API's own validation rules for temporal
/// query parameters; the second group maps transport outcomes.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ApiError {
    /// The `contentType` query parameter is mandatory for this operation.
    #[error("contentType queryParam is required")]
    ContentTypeRequired,

    /// Only one of `startTime`/`endTime` was given.
    #[error("startTime and endTime must both be provided or not at all")]
    IntervalMismatch,

    /// The requested interval is zero or negative.
    #[error("interval given is 0 or negative")]
    IntervalNegative,

    /// The requested interval spans more than 24 hours.
    #[error("interval given is more than 24 hours")]
    IntervalDay,

    /// The requested interval starts beyond the API's 7-day retention.
    #[error("startTime given is more than 7 days in the past")]
    IntervalWeek,

    /// A wire content-type string did not map to any known stream.
    #[error("unknown content type: {value}")]
    UnknownContentType { value: String },

    /// The API answered 400.
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// The API answered 404.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The API answered any other non-2xx status.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// A `NextPageUri` header was present but carried no `nextpage`
    /// query parameter, or its value was empty.
    #[error("nextpage is not present as a query param of the NextPageUri header")]
    NextPageCursor,

    /// A URL could not be built or parsed.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The HTTP round-trip itself failed.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            ApiError::ContentTypeRequired => "api_content_type_required",
            ApiError::IntervalMismatch => "api_interval_mismatch",
            ApiError::IntervalNegative => "api_interval_negative",
            ApiError::IntervalDay => "api_interval_day",
            ApiError::IntervalWeek => "api_interval_week",
            ApiError::UnknownContentType { .. } => "api_unknown_content_type",
            ApiError::BadRequest { .. } => "api_bad_request",
            ApiError::NotFound { .. } => "api_not_found",
            ApiError::Status { .. } => "api_status",
            ApiError::NextPageCursor => "api_next_page_cursor",
            ApiError::Url(_) => "api_url",
            ApiError::Transport(_) => "api_transport",
        }
    }

    /// Indicates whether retrying the call on a later sweep may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Status { .. } | ApiError::Transport(_))
    }
}

/// # Errors produced by record handlers.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Writing to the output sink failed.
    #[error("writing record: {0}")]
    Io(#[from] std::io::Error),
}

/// # Errors produced while persisting or restoring watcher state.
///
/// A [`StateError::Invalid`] on read is non-fatal by contract: the store
/// keeps its zero state and the watcher proceeds as a fresh start.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StateError {
    /// The state blob was empty or not decodable.
    #[error("state blob empty or invalid: {0}")]
    Invalid(#[from] serde_json::Error),

    /// Reading or writing the blob failed at the I/O layer.
    #[error("state blob io: {0}")]
    Io(#[from] std::io::Error),
}
