//! RequestCache - the per-request orchestration state machine.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use super::RequestCacheBuilder;
use crate::key::derive_key;
use crate::request::{CachingDefaults, NormalizedRequest, RequestDefaults, RequestDescriptor};
use crate::store::{CacheEntry, Store, StoreStats};
use crate::telemetry;
use crate::types::{CacheInfo, CachedResponse};
use crate::Result;

/// HTTP client that transparently caches responses.
///
/// Each request is normalized, mapped to a deterministic cache key, and
/// answered from the configured [`Store`] when a live entry exists.
/// Otherwise the request goes out over the shared `reqwest` client and the
/// buffered response is written back under the key (TTL permitting).
///
/// The store is an optimization layer, never a source of truth: a store
/// `get` failure degrades to a direct fetch, and a store `set` failure
/// never masks a successful fetch.
pub struct RequestCache {
    store: Arc<dyn Store>,
    http: reqwest::Client,
    request_defaults: RequestDefaults,
    caching_defaults: CachingDefaults,
}

impl std::fmt::Debug for RequestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache")
            .field("store", &self.store.name())
            .field("request_defaults", &self.request_defaults)
            .field("caching_defaults", &self.caching_defaults)
            .finish_non_exhaustive()
    }
}

impl RequestCache {
    /// Create a builder for configuring the client.
    pub fn builder() -> RequestCacheBuilder {
        RequestCacheBuilder::new()
    }

    pub(crate) fn new(
        store: Arc<dyn Store>,
        http: reqwest::Client,
        request_defaults: RequestDefaults,
        caching_defaults: CachingDefaults,
    ) -> Self {
        Self {
            store,
            http,
            request_defaults,
            caching_defaults,
        }
    }

    /// GET `uri` with `params` merged into the query string, cached for
    /// `ttl` seconds (`0` bypasses the store).
    pub async fn get(
        &self,
        uri: &str,
        params: &[(&str, &str)],
        ttl: u64,
    ) -> Result<CachedResponse> {
        self.request(
            RequestDescriptor::get(uri)
                .params(params.iter().copied())
                .ttl(ttl),
        )
        .await
    }

    /// POST `uri` with `params` form-urlencoded into the body, cached for
    /// `ttl` seconds (`0` bypasses the store).
    pub async fn post(
        &self,
        uri: &str,
        params: &[(&str, &str)],
        ttl: u64,
    ) -> Result<CachedResponse> {
        self.request(
            RequestDescriptor::post(uri)
                .params(params.iter().copied())
                .ttl(ttl),
        )
        .await
    }

    /// Perform one logical request described by `descriptor`.
    ///
    /// State machine: normalize and derive the key (fail fast on validation
    /// errors, before any I/O); consult the store unless the TTL is zero;
    /// on a live entry return it with `hit: true`; otherwise fetch over the
    /// transport, write the entry back when the TTL is positive, and return
    /// the fresh response with `hit: false`.
    #[instrument(skip_all, fields(method = %descriptor.method, uri = %descriptor.uri))]
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<CachedResponse> {
        let started = Instant::now();
        let normalized = descriptor.normalize(&self.request_defaults, &self.caching_defaults)?;
        let key = derive_key(&normalized)?;
        let method = normalized.method.as_str();
        let ttl = normalized.caching.ttl;

        if ttl == 0 {
            debug!(key, "caching disabled for this call");
            let entry = self.fetch(&normalized).await.inspect_err(|_| {
                metrics::counter!(telemetry::REQUESTS_TOTAL, "method" => method, "outcome" => "error").increment(1);
            })?;
            metrics::counter!(telemetry::REQUESTS_TOTAL, "method" => method, "outcome" => "bypass").increment(1);
            self.observe_duration(method, started);
            return Ok(respond(entry, key, false));
        }

        match self.store.get(&key).await {
            Ok(Some(entry)) => {
                debug!(key, "cache hit");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "store" => self.store.name()).increment(1);
                metrics::counter!(telemetry::REQUESTS_TOTAL, "method" => method, "outcome" => "hit").increment(1);
                self.observe_duration(method, started);
                return Ok(respond(entry, key, true));
            }
            Ok(None) => {
                debug!(key, "cache miss");
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "store" => self.store.name()).increment(1);
            }
            // A cache outage degrades to a direct fetch; it must not fail
            // the user request.
            Err(e) => {
                warn!(key, error = %e, "store get failed, fetching directly");
                metrics::counter!(telemetry::STORE_ERRORS_TOTAL, "store" => self.store.name(), "operation" => "get").increment(1);
            }
        }

        let entry = self.fetch(&normalized).await.inspect_err(|_| {
            metrics::counter!(telemetry::REQUESTS_TOTAL, "method" => method, "outcome" => "error").increment(1);
        })?;

        if let Err(e) = self
            .store
            .set(&key, entry.clone(), Duration::from_secs(ttl))
            .await
        {
            warn!(key, error = %e, "store set failed, returning fresh response");
            metrics::counter!(telemetry::STORE_ERRORS_TOTAL, "store" => self.store.name(), "operation" => "set").increment(1);
        }

        metrics::counter!(telemetry::REQUESTS_TOTAL, "method" => method, "outcome" => "miss").increment(1);
        self.observe_duration(method, started);
        Ok(respond(entry, key, false))
    }

    /// The store backing this client. Useful for explicit invalidation of
    /// a key returned in [`CacheInfo`](crate::CacheInfo).
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Cumulative hit/miss counters of the backing store.
    pub fn store_stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Perform the transport round-trip and buffer the response into the
    /// serializable subset a store can persist. Any HTTP status counts as
    /// a completed round-trip; only transport failures are errors.
    async fn fetch(&self, request: &NormalizedRequest) -> Result<CacheEntry> {
        let mut builder = self
            .http
            .request(request.method.as_reqwest(), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(CacheEntry {
            status,
            headers,
            body,
        })
    }

    fn observe_duration(&self, method: &'static str, started: Instant) {
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "method" => method)
            .record(started.elapsed().as_secs_f64());
    }
}

fn respond(entry: CacheEntry, key: String, hit: bool) -> CachedResponse {
    CachedResponse {
        status: entry.status,
        headers: entry.headers,
        body: entry.body,
        cache: CacheInfo { key, hit },
    }
}
