use serde::{Deserialize, Serialize};

/// Metadata pointing at a retrievable batch of audit records.
///
/// The API lists content blobs in the order their aggregations become
/// available; events inside one aggregation are not guaranteed to be
/// sequential. `content_created` stays a string until the audit stage
/// parses it; `content_expiration` is carried but never filtered on,
/// the fetch is attempted regardless.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub content_type: String,
    pub content_id: String,
    pub content_uri: String,
    pub content_created: String,
    pub content_expiration: String,
}
