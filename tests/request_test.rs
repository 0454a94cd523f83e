//! Tests for request normalization — defaults merging, parameter
//! placement, and fail-fast validation.

use reqcache::request::{CachingDefaults, RequestDefaults, RequestDescriptor};
use reqcache::{Method, ReqcacheError};

fn defaults() -> (RequestDefaults, CachingDefaults) {
    (RequestDefaults::default(), CachingDefaults::default())
}

// =========================================================================
// GET normalization
// =========================================================================

#[test]
fn get_merges_params_with_existing_query() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::get("http://example.com/search?q=rust")
        .param("page", "2")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(normalized.url.query(), Some("page=2&q=rust"));
}

#[test]
fn get_descriptor_param_overrides_uri_param() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::get("http://example.com/search?q=old")
        .param("q", "new")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(normalized.url.query(), Some("q=new"));
}

#[test]
fn get_without_params_has_no_query() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::get("http://example.com/users")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(normalized.url.query(), None);
    assert!(normalized.body.is_none());
}

#[test]
fn get_params_are_urlencoded() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::get("http://example.com/search")
        .param("q", "hello world")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(normalized.url.query(), Some("q=hello+world"));
}

#[test]
fn get_never_has_a_body() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::get("http://example.com/x")
        .param("a", "1")
        .normalize(&req, &caching)
        .unwrap();
    assert!(normalized.body.is_none());
}

// =========================================================================
// POST normalization
// =========================================================================

#[test]
fn post_serializes_params_into_body() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::post("http://example.com/submit")
        .param("b", "2")
        .param("a", "1")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(normalized.body.as_deref(), Some("a=1&b=2"));
}

#[test]
fn post_sets_form_headers() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::post("http://example.com/submit")
        .param("a", "1")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(
        normalized.headers.get("Content-Type").map(String::as_str),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        normalized.headers.get("Content-Length").map(String::as_str),
        Some("3")
    );
}

#[test]
fn post_keeps_caller_supplied_content_type() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::post("http://example.com/submit")
        .param("a", "1")
        .header("Content-Type", "application/json")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(
        normalized.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
}

#[test]
fn post_without_params_has_no_body_or_form_headers() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::post("http://example.com/submit")
        .normalize(&req, &caching)
        .unwrap();
    assert!(normalized.body.is_none());
    assert!(!normalized.headers.contains_key("Content-Type"));
    assert!(!normalized.headers.contains_key("Content-Length"));
}

#[test]
fn post_leaves_uri_query_untouched() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::post("http://example.com/submit?v=1")
        .param("a", "1")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(normalized.url.query(), Some("v=1"));
    assert_eq!(normalized.body.as_deref(), Some("a=1"));
}

#[test]
fn put_carries_params_in_body_like_post() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::new(Method::Put, "http://example.com/item/1")
        .param("name", "x")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(normalized.body.as_deref(), Some("name=x"));
    assert_eq!(normalized.url.query(), None);
}

// =========================================================================
// Defaults merging
// =========================================================================

#[test]
fn caching_defaults_apply_when_unset() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::get("http://example.com/x")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(normalized.caching.ttl, 3600);
    assert_eq!(normalized.caching.prefix, "requestCaching");
    assert!(normalized.caching.key.is_none());
}

#[test]
fn descriptor_overrides_caching_defaults() {
    let (req, caching) = defaults();
    let normalized = RequestDescriptor::get("http://example.com/x")
        .ttl(0)
        .key_prefix("other")
        .normalize(&req, &caching)
        .unwrap();
    assert_eq!(normalized.caching.ttl, 0);
    assert_eq!(normalized.caching.prefix, "other");
}

#[test]
fn default_headers_merge_under_descriptor_headers() {
    let mut req = RequestDefaults::default();
    req.headers
        .insert("User-Agent".to_string(), "reqcache".to_string());
    req.headers
        .insert("Accept".to_string(), "text/plain".to_string());
    let caching = CachingDefaults::default();

    let normalized = RequestDescriptor::get("http://example.com/x")
        .header("Accept", "application/json")
        .normalize(&req, &caching)
        .unwrap();

    // Descriptor wins per field, untouched defaults are inherited.
    assert_eq!(
        normalized.headers.get("Accept").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(
        normalized.headers.get("User-Agent").map(String::as_str),
        Some("reqcache")
    );
}

// =========================================================================
// Validation
// =========================================================================

#[test]
fn empty_uri_fails_with_field_name() {
    let (req, caching) = defaults();
    let err = RequestDescriptor::get("")
        .normalize(&req, &caching)
        .unwrap_err();
    assert!(matches!(
        err,
        ReqcacheError::Validation { field: "uri", .. }
    ));
}

#[test]
fn malformed_uri_fails_with_field_name() {
    let (req, caching) = defaults();
    let err = RequestDescriptor::get("not a uri")
        .normalize(&req, &caching)
        .unwrap_err();
    assert!(matches!(
        err,
        ReqcacheError::Validation { field: "uri", .. }
    ));
}

#[test]
fn empty_explicit_key_fails_with_field_name() {
    let (req, caching) = defaults();
    let err = RequestDescriptor::get("http://example.com/x")
        .key("")
        .normalize(&req, &caching)
        .unwrap_err();
    assert!(matches!(
        err,
        ReqcacheError::Validation { field: "key", .. }
    ));
}
