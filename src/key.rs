//! Cache key derivation.
//!
//! A cache key is a deterministic string identifying a cacheable request.
//! An explicit key set on the descriptor always wins; otherwise the key is
//! a SHA-256 hex digest of the canonical request representation:
//!
//! ```text
//! method \n url-with-canonical-query \n body \n header pairs (sorted, k=v per line)
//! ```
//!
//! Normalization already rewrites the query (GET) or body (POST) from
//! ordered maps, so two requests with the same parameter set always hash
//! identically regardless of insertion order. SHA-256 is stable across
//! processes, which keeps keys valid for shared backends such as Redis.

use sha2::{Digest, Sha256};

use crate::request::NormalizedRequest;
use crate::{ReqcacheError, Result};

/// Derive the cache key for a normalized request.
///
/// Precedence: explicit key > content hash. Both forms carry the resolved
/// prefix (`prefix:rest`); an empty prefix yields the bare key.
pub fn derive_key(request: &NormalizedRequest) -> Result<String> {
    if let Some(explicit) = &request.caching.key {
        return Ok(prefixed(&request.caching.prefix, explicit));
    }

    let canonical = canonical_representation(request);
    if canonical.is_empty() {
        return Err(ReqcacheError::Configuration(
            "nothing to derive a cache key from; set an explicit key".to_string(),
        ));
    }

    let digest = Sha256::digest(canonical.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    Ok(prefixed(&request.caching.prefix, &hex))
}

fn prefixed(prefix: &str, rest: &str) -> String {
    if prefix.is_empty() {
        rest.to_string()
    } else {
        format!("{prefix}:{rest}")
    }
}

fn canonical_representation(request: &NormalizedRequest) -> String {
    let mut canonical = String::new();
    canonical.push_str(request.method.as_str());
    canonical.push('\n');
    canonical.push_str(request.url.as_str());
    canonical.push('\n');
    if let Some(body) = &request.body {
        canonical.push_str(body);
    }
    for (name, value) in &request.headers {
        canonical.push('\n');
        canonical.push_str(name);
        canonical.push('=');
        canonical.push_str(value);
    }
    canonical
}
