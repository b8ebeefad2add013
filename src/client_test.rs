use reqwest::header::{HeaderMap, HeaderValue};
use url::Url;

use crate::client::{next_page_cursor, Client};
use crate::error::ApiError;

fn headers_with_next_page(uri: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("NextPageUri", HeaderValue::from_str(uri).unwrap());
    headers
}

#[test]
fn endpoints_live_under_the_tenant_feed_path() {
    let client = Client::new(None, "test-tenant", "").expect("client builds");
    let url = client.endpoint("subscriptions/content").expect("valid url");
    assert_eq!(
        url.as_str(),
        "https://manage.office.com/api/v1.0/test-tenant/activity/feed/subscriptions/content"
    );

    let url = client.endpoint("audit/abc-123").expect("valid url");
    assert_eq!(
        url.as_str(),
        "https://manage.office.com/api/v1.0/test-tenant/activity/feed/audit/abc-123"
    );
}

#[test]
fn base_url_is_constructor_plumbed() {
    let client = Client::new(None, "t", "")
        .expect("client builds")
        .with_base_url(Url::parse("http://127.0.0.1:8080").unwrap());
    let url = client.endpoint("subscriptions/list").expect("valid url");
    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:8080/api/v1.0/t/activity/feed/subscriptions/list"
    );
}

#[test]
fn absent_pagination_header_ends_the_listing() {
    assert!(matches!(next_page_cursor(&HeaderMap::new()), Ok(None)));
}

#[test]
fn pagination_cursor_is_extracted_verbatim() {
    let headers = headers_with_next_page(
        "https://manage.office.com/api/v1.0/t/activity/feed/subscriptions/content?startTime=2024-03-04T00%3A00&nextpage=2bLkY3VyJzb3I",
    );
    let cursor = next_page_cursor(&headers).expect("cursor extracts");
    assert_eq!(cursor.as_deref(), Some("2bLkY3VyJzb3I"));
}

#[test]
fn pagination_header_without_cursor_is_fatal() {
    let headers = headers_with_next_page("https://manage.office.com/feed/content?foo=bar");
    assert!(matches!(
        next_page_cursor(&headers),
        Err(ApiError::NextPageCursor)
    ));

    let headers = headers_with_next_page("https://manage.office.com/feed/content?nextpage=");
    assert!(matches!(
        next_page_cursor(&headers),
        Err(ApiError::NextPageCursor)
    ));
}

#[test]
fn malformed_pagination_header_is_fatal() {
    let headers = headers_with_next_page("::not a uri::");
    assert!(matches!(next_page_cursor(&headers), Err(ApiError::Url(_))));
}
