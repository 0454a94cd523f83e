//! Caller-facing response types.

use std::collections::BTreeMap;

/// Whether a request was answered from the store, and under which key.
///
/// Always present on a [`CachedResponse`], so callers can distinguish
/// "served fresh with caching disabled" from "served fresh after a miss"
/// from "served from cache".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    /// The derived (or explicit) cache key for this request.
    pub key: String,
    /// `true` when the response body came from the store.
    pub hit: bool,
}

/// The outcome of one request: response data plus cache disposition.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    /// HTTP status code of the (possibly cached) response.
    pub status: u16,
    /// Response headers — the serializable subset captured at fetch time.
    pub headers: BTreeMap<String, String>,
    /// Fully buffered response body.
    pub body: String,
    pub cache: CacheInfo,
}
