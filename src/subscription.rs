use serde::{Deserialize, Serialize};

/// An upstream-side registration that makes a content type queryable.
///
/// Subscriptions are discovered through the list operation and never
/// mutated by the watcher. The `content_type` stays in its wire form
/// here; mapping to [`ContentType`](crate::ContentType) happens per
/// sweep so an unknown stream only costs a logged skip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub content_type: String,
    pub status: String,
    #[serde(default)]
    pub webhook: Option<Webhook>,
}

/// Webhook registration payload, used both in start requests and in
/// subscription listings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}
