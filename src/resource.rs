//! Staged envelopes passed between pipeline stages.
//!
//! Each envelope carries the content type it belongs to and the request
//! time of the sweep that produced it, so every emitted record can be
//! traced back to the tick that harvested it.

use chrono::{DateTime, Utc};

use crate::content::Content;
use crate::content_type::ContentType;
use crate::subscription::Subscription;

/// One event or action payload returned by the audit endpoint.
///
/// The watcher treats records as opaque; decoding into concrete event
/// schemas is the consumer's concern.
pub type AuditRecord = serde_json::Value;

/// A sweep job for a single content type, produced by the subscription
/// lister and routed to the owning worker.
#[derive(Clone, Debug)]
pub struct ResourceSubscription {
    pub content_type: ContentType,
    pub request_time: DateTime<Utc>,
    pub subscription: Subscription,
}

/// A content descriptor travelling from the content lister to the audit
/// fetcher of the same worker.
#[derive(Clone, Debug)]
pub struct ResourceContent {
    pub content_type: ContentType,
    pub request_time: DateTime<Utc>,
    pub content: Content,
}

/// One enriched audit record on its way to the handler.
#[derive(Clone, Debug)]
pub struct ResourceAudit {
    pub content_type: ContentType,
    pub request_time: DateTime<Utc>,
    pub record: AuditRecord,
}
