//! Request descriptors and normalization.
//!
//! A [`RequestDescriptor`] is the caller-facing description of one logical
//! outbound call. Before anything touches the network or a store, it is
//! resolved against the client's defaults into a [`NormalizedRequest`]:
//! the URI is parsed, parameters are folded into the query string (GET) or
//! a form-urlencoded body (POST), and the caching options (TTL, key prefix,
//! explicit key) are fixed. Key derivation and transport both operate on
//! the normalized form only.

use std::collections::BTreeMap;
use std::fmt;

use url::Url;
use url::form_urlencoded;

use crate::{ReqcacheError, Result};

/// HTTP method of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Method {
    /// Canonical upper-case name, as used in key derivation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }

    /// Whether parameters are carried in the body rather than the query.
    pub(crate) fn uses_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }

    pub(crate) fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default request fields resolved at construction time, merged into
/// every call. Descriptor values win over defaults per field.
#[derive(Debug, Clone, Default)]
pub struct RequestDefaults {
    /// Headers applied to every request unless the descriptor sets the
    /// same header name.
    pub headers: BTreeMap<String, String>,
}

/// Default caching options resolved at construction time.
#[derive(Debug, Clone)]
pub struct CachingDefaults {
    /// Seconds an entry remains valid. `0` disables caching.
    pub ttl: u64,
    /// Namespace prepended to every cache key. Empty string disables
    /// the prefix segment.
    pub prefix: String,
}

impl Default for CachingDefaults {
    fn default() -> Self {
        Self {
            ttl: 3600,
            prefix: "requestCaching".to_string(),
        }
    }
}

/// Description of one logical outbound call.
///
/// Parameters and headers are kept in ordered maps so that two descriptors
/// differing only in insertion order normalize identically.
///
/// ```rust
/// use reqcache::RequestDescriptor;
///
/// let descriptor = RequestDescriptor::get("http://api.example.com/search")
///     .param("q", "rust")
///     .ttl(300);
/// ```
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub uri: String,
    pub method: Method,
    pub params: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    /// Per-call TTL override (seconds). `None` inherits the client default.
    pub ttl: Option<u64>,
    /// Per-call key prefix override. `None` inherits the client default.
    pub key_prefix: Option<String>,
    /// Explicit cache key. When set, no hash is computed.
    pub key: Option<String>,
}

impl RequestDescriptor {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            method,
            params: BTreeMap::new(),
            headers: BTreeMap::new(),
            ttl: None,
            key_prefix: None,
            key: None,
        }
    }

    /// Shorthand for a GET descriptor.
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::Get, uri)
    }

    /// Shorthand for a POST descriptor.
    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::Post, uri)
    }

    /// Add a single parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Add multiple parameters.
    pub fn params<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in pairs {
            self.params.insert(k.into(), v.into());
        }
        self
    }

    /// Set a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Override the TTL for this call (seconds). `0` bypasses the store.
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.ttl = Some(seconds);
        self
    }

    /// Override the key prefix for this call.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Use an explicit cache key instead of the derived hash.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Resolve this descriptor against the client defaults.
    ///
    /// Fails fast with a [`Validation`](ReqcacheError::Validation) error —
    /// before any network or store activity — on an empty or malformed URI
    /// or an empty explicit key.
    pub fn normalize(
        &self,
        request_defaults: &RequestDefaults,
        caching_defaults: &CachingDefaults,
    ) -> Result<NormalizedRequest> {
        if self.uri.is_empty() {
            return Err(ReqcacheError::validation("uri", "must not be empty"));
        }
        let mut url = Url::parse(&self.uri)
            .map_err(|e| ReqcacheError::validation("uri", e.to_string()))?;

        let mut headers = request_defaults.headers.clone();
        headers.extend(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())));

        let body = if self.method.uses_body() {
            let payload = serialize_params(self.params.iter());
            if payload.is_empty() {
                None
            } else {
                headers
                    .entry("Content-Type".to_string())
                    .or_insert_with(|| "application/x-www-form-urlencoded".to_string());
                headers
                    .entry("Content-Length".to_string())
                    .or_insert_with(|| payload.len().to_string());
                Some(payload)
            }
        } else {
            // Fold params over any query already embedded in the URI;
            // descriptor params win per key. Rewriting through a BTreeMap
            // makes the final query order-independent.
            let mut merged: BTreeMap<String, String> = url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            merged.extend(self.params.iter().map(|(k, v)| (k.clone(), v.clone())));
            if merged.is_empty() {
                url.set_query(None);
            } else {
                url.set_query(Some(&serialize_params(merged.iter())));
            }
            None
        };

        let key = match &self.key {
            Some(k) if k.is_empty() => {
                return Err(ReqcacheError::validation("key", "must not be empty"));
            }
            other => other.clone(),
        };

        Ok(NormalizedRequest {
            method: self.method,
            url,
            headers,
            body,
            caching: ResolvedCaching {
                ttl: self.ttl.unwrap_or(caching_defaults.ttl),
                prefix: self
                    .key_prefix
                    .clone()
                    .unwrap_or_else(|| caching_defaults.prefix.clone()),
                key,
            },
        })
    }
}

/// Caching options after defaults resolution.
#[derive(Debug, Clone)]
pub struct ResolvedCaching {
    pub ttl: u64,
    pub prefix: String,
    pub key: Option<String>,
}

/// A descriptor after defaults-merging and parameter serialization,
/// ready for key derivation and transport.
///
/// Invariant: parameters live in exactly one place — the URL query for
/// query-carrying methods, the body for body-carrying methods.
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    /// Form-urlencoded payload, present only for non-empty POST/PUT params.
    pub body: Option<String>,
    pub caching: ResolvedCaching,
}

fn serialize_params<'a>(pairs: impl Iterator<Item = (&'a String, &'a String)>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
