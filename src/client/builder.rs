//! Builder for configuring [`RequestCache`] instances.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use super::RequestCache;
use crate::request::{CachingDefaults, RequestDefaults};
use crate::store::{Store, StoreConfig};
use crate::{ReqcacheError, Result};

enum StoreSelection {
    /// Raw adapter name, resolved (and validated) at `build()` time.
    Adapter(String),
    Config(StoreConfig),
    Instance(Arc<dyn Store>),
}

/// Builder for configuring [`RequestCache`] instances.
///
/// ```rust
/// use reqcache::RequestCache;
///
/// # fn main() -> reqcache::Result<()> {
/// let cache = RequestCache::builder()
///     .store_adapter("memory")
///     .default_ttl(600)
///     .key_prefix("search")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct RequestCacheBuilder {
    store: StoreSelection,
    default_ttl: u64,
    key_prefix: String,
    default_headers: BTreeMap<String, String>,
    timeout_secs: Option<u64>,
}

impl RequestCacheBuilder {
    pub fn new() -> Self {
        let caching = CachingDefaults::default();
        Self {
            store: StoreSelection::Config(StoreConfig::Memory),
            default_ttl: caching.ttl,
            key_prefix: caching.prefix,
            default_headers: BTreeMap::new(),
            timeout_secs: None,
        }
    }

    /// Select the store backend by adapter name (`"memory"`, `"redis"`).
    ///
    /// Resolution happens in [`build()`](Self::build): an unknown name
    /// fails construction, not the first request.
    pub fn store_adapter(mut self, name: impl Into<String>) -> Self {
        self.store = StoreSelection::Adapter(name.into());
        self
    }

    /// Select the store backend with explicit options.
    pub fn store(mut self, config: StoreConfig) -> Self {
        self.store = StoreSelection::Config(config);
        self
    }

    /// Use a caller-provided store implementation.
    pub fn store_instance(mut self, store: Arc<dyn Store>) -> Self {
        self.store = StoreSelection::Instance(store);
        self
    }

    /// Default TTL in seconds for requests that don't set one (default 3600).
    /// `0` disables caching unless a call overrides it.
    pub fn default_ttl(mut self, seconds: u64) -> Self {
        self.default_ttl = seconds;
        self
    }

    /// Namespace prepended to every cache key (default "requestCaching").
    /// An empty string drops the prefix segment entirely.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Header sent with every request unless the descriptor overrides it.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Transport timeout for all requests (seconds).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the client, resolving the store adapter.
    pub fn build(self) -> Result<RequestCache> {
        let store = match self.store {
            StoreSelection::Adapter(name) => StoreConfig::from_adapter(&name)?.build()?,
            StoreSelection::Config(config) => config.build()?,
            StoreSelection::Instance(store) => store,
        };

        let mut http = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            http = http.timeout(Duration::from_secs(secs));
        }
        let http = http
            .build()
            .map_err(|e| ReqcacheError::Configuration(format!("http client: {e}")))?;

        Ok(RequestCache::new(
            store,
            http,
            RequestDefaults {
                headers: self.default_headers,
            },
            CachingDefaults {
                ttl: self.default_ttl,
                prefix: self.key_prefix,
            },
        ))
    }
}

impl Default for RequestCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}
