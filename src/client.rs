//! # HTTP client for the Office 365 Management Activity API.
//!
//! Operations live under
//! `https://manage.office.com/api/v1.0/{tenant_id}/activity/feed/{operation}`.
//!
//! [`Client`] performs the five feed operations; [`ActivityApi`] is the
//! seam the watcher consumes, so tests and alternative transports can
//! stand in for the real endpoint. Authentication is a collaborator
//! concern: pass a `reqwest::Client` that injects the bearer token
//! (client-credentials flow against
//! `https://login.windows.net/{tenant_domain}/oauth2/token`).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::content::Content;
use crate::content_type::ContentType;
use crate::error::ApiError;
use crate::params::QueryParams;
use crate::resource::AuditRecord;
use crate::subscription::{Subscription, Webhook};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://manage.office.com";

const DEFAULT_VERSION: &str = "v1.0";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const NEXT_PAGE_HEADER: &str = "NextPageUri";

/// The five feed operations the watcher and its callers invoke.
#[async_trait]
pub trait ActivityApi: Send + Sync + 'static {
    /// Lists the current subscriptions together with their webhooks.
    async fn subscriptions(&self) -> Result<Vec<Subscription>, ApiError>;

    /// Starts (or re-enables) a subscription for the given content type,
    /// optionally registering a webhook.
    async fn start_subscription(
        &self,
        ct: ContentType,
        webhook: Option<&Webhook>,
    ) -> Result<Subscription, ApiError>;

    /// Stops the subscription for the given content type.
    async fn stop_subscription(&self, ct: ContentType) -> Result<(), ApiError>;

    /// Lists the content blobs available for retrieval inside the given
    /// window, following pagination to exhaustion.
    async fn content(
        &self,
        ct: ContentType,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Content>, ApiError>;

    /// Retrieves the batch of audit records behind a content id.
    async fn audit(&self, content_id: &str) -> Result<Vec<AuditRecord>, ApiError>;
}

/// Concrete [`ActivityApi`] over HTTP.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    version: String,
    user_agent: String,
    timeout: Duration,
    tenant_id: String,
    publisher_identifier: String,
}

impl Client {
    /// Creates a client for the given tenant.
    ///
    /// `http` is typically a pre-authenticated `reqwest::Client`; `None`
    /// builds a plain one, which can only reach endpoints that accept
    /// anonymous calls (useful against stub servers). An empty
    /// `publisher_identifier` falls back to the tenant id, mirroring how
    /// the upstream accounts quotas.
    pub fn new(
        http: Option<reqwest::Client>,
        tenant_id: impl Into<String>,
        publisher_identifier: &str,
    ) -> Result<Self, ApiError> {
        let tenant_id = tenant_id.into();
        let publisher_identifier = if publisher_identifier.is_empty() {
            tenant_id.clone()
        } else {
            publisher_identifier.to_string()
        };
        Ok(Self {
            http: http.unwrap_or_default(),
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            version: DEFAULT_VERSION.to_string(),
            user_agent: format!("auditfeed/{}", env!("CARGO_PKG_VERSION")),
            timeout: DEFAULT_TIMEOUT,
            tenant_id,
            publisher_identifier,
        })
    }

    /// Overrides the API host, e.g. to point at a stub server.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn base_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.publisher_identifier(&self.publisher_identifier);
        params
    }

    pub(crate) fn endpoint(&self, operation: &str) -> Result<Url, ApiError> {
        let path = format!(
            "/api/{}/{}/activity/feed/{}",
            self.version, self.tenant_id, operation
        );
        Ok(self.base_url.join(&path)?)
    }

    async fn request(
        &self,
        method: Method,
        operation: &str,
        params: &QueryParams,
        body: Option<&Webhook>,
    ) -> Result<Response, ApiError> {
        let url = self.endpoint(operation)?;
        debug!("request: {method} {url}");
        let mut request = self
            .http
            .request(method, url)
            .query(params.as_pairs())
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }
        check_response(request.send().await?).await
    }
}

#[async_trait]
impl ActivityApi for Client {
    async fn subscriptions(&self) -> Result<Vec<Subscription>, ApiError> {
        let params = self.base_params();
        let response = self
            .request(Method::GET, "subscriptions/list", &params, None)
            .await?;
        Ok(response.json().await?)
    }

    async fn start_subscription(
        &self,
        ct: ContentType,
        webhook: Option<&Webhook>,
    ) -> Result<Subscription, ApiError> {
        let mut params = self.base_params();
        params.content_type(Some(ct))?;
        let response = self
            .request(Method::POST, "subscriptions/start", &params, webhook)
            .await?;
        Ok(response.json().await?)
    }

    async fn stop_subscription(&self, ct: ContentType) -> Result<(), ApiError> {
        let mut params = self.base_params();
        params.content_type(Some(ct))?;
        self.request(Method::POST, "subscriptions/stop", &params, None)
            .await?;
        Ok(())
    }

    async fn content(
        &self,
        ct: ContentType,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Content>, ApiError> {
        let mut params = self.base_params();
        params.content_type(Some(ct))?;
        params.start_end_time(start, end)?;

        let mut out = Vec::new();
        loop {
            let response = self
                .request(Method::GET, "subscriptions/content", &params, None)
                .await?;
            let cursor = next_page_cursor(response.headers())?;
            let page: Vec<Content> = response.json().await?;
            out.extend(page);
            match cursor {
                Some(cursor) => params.next_page(&cursor),
                None => break,
            }
        }
        Ok(out)
    }

    async fn audit(&self, content_id: &str) -> Result<Vec<AuditRecord>, ApiError> {
        if content_id.is_empty() {
            return Err(ApiError::BadRequest {
                message: "contentId must not be empty".into(),
            });
        }
        let params = QueryParams::new();
        let response = self
            .request(Method::GET, &format!("audit/{content_id}"), &params, None)
            .await?;
        Ok(response.json().await?)
    }
}

/// Extracts the pagination cursor from a `NextPageUri` response header.
///
/// Absent header means the listing is complete. A header whose URI lacks
/// a non-empty `nextpage` query parameter is an error: continuing would
/// silently truncate the listing.
pub(crate) fn next_page_cursor(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(value) = headers.get(NEXT_PAGE_HEADER) else {
        return Ok(None);
    };
    let uri = value.to_str().map_err(|_| ApiError::NextPageCursor)?;
    let uri = Url::parse(uri)?;
    let cursor = uri
        .query_pairs()
        .find(|(key, _)| key == "nextpage")
        .map(|(_, value)| value.into_owned())
        .filter(|cursor| !cursor.is_empty());
    cursor.map(Some).ok_or(ApiError::NextPageCursor)
}

/// Body shape the API uses to report failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

async fn check_response(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => format!("{}: {}", body.error.code, body.error.message),
        Err(_) => status.to_string(),
    };
    Err(match status {
        StatusCode::BAD_REQUEST => ApiError::BadRequest { message },
        StatusCode::NOT_FOUND => ApiError::NotFound { message },
        status => ApiError::Status {
            status: status.as_u16(),
            message,
        },
    })
}
