//! Telemetry metric name constants.
//!
//! Centralised metric names for chart operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `occon_chart_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `reason`: why the cache was bypassed: "empty", "stale" or "debug"
//! - `status`: outcome: "ok" or "error"

/// Total chart requests answered from the cache.
pub const CACHE_HITS_TOTAL: &str = "occon_chart_cache_hits_total";

/// Total chart requests that had to refresh from upstream.
///
/// Labels: `reason` ("empty" | "stale" | "debug").
pub const CACHE_MISSES_TOTAL: &str = "occon_chart_cache_misses_total";

/// Total upstream refreshes attempted.
///
/// Labels: `status` ("ok" | "error").
pub const REFRESHES_TOTAL: &str = "occon_chart_refreshes_total";

/// Duration of a full upstream refresh (all four bucket queries) in seconds.
pub const REFRESH_DURATION_SECONDS: &str = "occon_chart_refresh_duration_seconds";
