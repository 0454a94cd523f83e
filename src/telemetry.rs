//! Telemetry metric name constants.
//!
//! Centralised metric names for reqcache operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `reqcache_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `method` — HTTP method of the request (e.g. "GET", "POST")
//! - `store` — store adapter name (e.g. "memory", "redis")
//! - `operation` — store operation ("get" | "set")
//! - `outcome` — request outcome: "hit", "miss", "bypass", or "error"

/// Total requests dispatched through the orchestrator.
///
/// Labels: `method`, `outcome` ("hit" | "miss" | "bypass" | "error").
pub const REQUESTS_TOTAL: &str = "reqcache_requests_total";

/// Request duration in seconds, including any store round-trips.
///
/// Labels: `method`.
pub const REQUEST_DURATION_SECONDS: &str = "reqcache_request_duration_seconds";

/// Total cache hits.
///
/// Labels: `store`.
pub const CACHE_HITS_TOTAL: &str = "reqcache_cache_hits_total";

/// Total cache misses.
///
/// Labels: `store`.
pub const CACHE_MISSES_TOTAL: &str = "reqcache_cache_misses_total";

/// Total store failures absorbed by the orchestrator.
///
/// Labels: `store`, `operation` ("get" | "set").
pub const STORE_ERRORS_TOTAL: &str = "reqcache_store_errors_total";
