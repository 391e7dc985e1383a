//! Chart data service.
//!
//! [`ChartDataService`] answers chart requests from a single cached
//! aggregation and refreshes it from the [`ContentSource`] when the entry is
//! missing, stale, or the caller asks for a debug run.
//!
//! # Refresh policy
//!
//! | request        | cache valid | upstream call | query shape                    |
//! |----------------|-------------|---------------|--------------------------------|
//! | `debug=false`  | yes         | no            | -                              |
//! | `debug=false`  | no          | yes           | bucket tags `+<event>`, no cap |
//! | `debug=true`   | any         | yes           | bucket tags, capped at 30      |
//!
//! Refreshes are serialised by a single lock, so at most one upstream fetch
//! is in flight. A request that waited on the lock re-checks the cache
//! before fetching, which collapses a burst of misses into one refresh.
//! A failed refresh leaves the cached entry untouched.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::cache::{CacheConfig, CacheEntry, ChartCache};
use crate::clock::{Clock, SystemClock};
use crate::source::ContentSource;
use crate::telemetry;
use crate::types::{Bucket, ChartData, PageQuery, PageSummary};

/// Site the chart aggregates over.
pub const DEFAULT_SITE: &str = "scp-jp";

/// Tag restricting production queries to contest entries.
pub const DEFAULT_EVENT_TAG: &str = "occon";

/// Per-bucket result cap for debug runs.
pub const DEFAULT_DEBUG_LIMIT: usize = 30;

/// Base tag expression for each bucket, before the event restriction.
///
/// The classified buckets drop explained and contest-hub pages; "other" is
/// an any-of over the remaining classes and takes no exclusions.
pub fn bucket_tags(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Safe => "+safe -explained -コンテスト",
        Bucket::Euclid => "+euclid -explained -コンテスト",
        Bucket::Keter => "+keter -explained -コンテスト",
        Bucket::Other => {
            "thaumiel neutralized apollyon archon ticonderoga decommissioned pending esoteric-class explained"
        }
    }
}

/// Sum of non-negative ratings.
///
/// Negatively rated pages are dropped, not subtracted.
pub fn sum_ratings(pages: &[PageSummary]) -> f64 {
    pages
        .iter()
        .map(|page| page.rating)
        .filter(|rating| *rating >= 0.0)
        .sum()
}

/// Configuration for [`ChartDataService`].
///
/// ```rust
/// # use occon_chart::ServiceConfig;
/// let config = ServiceConfig::new().site("scp-wiki").debug_limit(10);
/// assert_eq!(config.site, "scp-wiki");
/// assert_eq!(config.event_tag, "occon");
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Site name on the content source. Default: `scp-jp`.
    pub site: String,
    /// Tag required on every production query. Empty disables the
    /// restriction. Default: `occon`.
    pub event_tag: String,
    /// Result cap per bucket on debug runs. Default: 30.
    pub debug_limit: usize,
    /// Cache settings.
    pub cache: CacheConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            site: DEFAULT_SITE.to_string(),
            event_tag: DEFAULT_EVENT_TAG.to_string(),
            debug_limit: DEFAULT_DEBUG_LIMIT,
            cache: CacheConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    pub fn event_tag(mut self, tag: impl Into<String>) -> Self {
        self.event_tag = tag.into();
        self
    }

    pub fn debug_limit(mut self, limit: usize) -> Self {
        self.debug_limit = limit;
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }
}

/// Cached rating aggregation over the four object-class buckets.
pub struct ChartDataService {
    source: Arc<dyn ContentSource>,
    cache: ChartCache,
    clock: Arc<dyn Clock>,
    refresh_lock: Mutex<()>,
    config: ServiceConfig,
}

impl ChartDataService {
    /// Create a service reading wall-clock time.
    pub fn new(source: Arc<dyn ContentSource>, config: ServiceConfig) -> Self {
        Self {
            source,
            cache: ChartCache::new(&config.cache),
            clock: Arc::new(SystemClock),
            refresh_lock: Mutex::new(()),
            config,
        }
    }

    /// Replace the time source used for cache expiry.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache(&self) -> &ChartCache {
        &self.cache
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Build the search for one bucket.
    ///
    /// Production queries require the event tag and are uncapped; debug
    /// queries drop the event tag and are capped at `debug_limit`.
    pub fn bucket_query(&self, bucket: Bucket, debug: bool) -> PageQuery {
        let tags = bucket_tags(bucket);
        if debug {
            PageQuery::new(tags).limit(self.config.debug_limit)
        } else if self.config.event_tag.is_empty() {
            PageQuery::new(tags)
        } else {
            PageQuery::new(format!("{tags} +{}", self.config.event_tag))
        }
    }

    /// Return chart data, refreshing from upstream when needed.
    ///
    /// A valid cached entry is returned unchanged unless `debug_run` is set.
    /// Otherwise the four buckets are re-aggregated and the result replaces
    /// the cached entry.
    #[instrument(skip(self, debug_run), fields(site = %self.config.site, debug = debug_run))]
    pub async fn get_chart_data(&self, debug_run: bool) -> Result<Arc<ChartData>> {
        if !debug_run {
            if let Some(chart) = self.cache.get(self.clock.now()) {
                return Ok(Self::cache_hit(chart));
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // Another request may have refreshed while we waited for the lock.
        let reason = match self.cache.peek() {
            _ if debug_run => "debug",
            Some(entry) if entry.is_valid(self.clock.now(), self.cache.ttl()) => {
                return Ok(Self::cache_hit(entry.chart));
            }
            Some(_) => "stale",
            None => "empty",
        };
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "reason" => reason).increment(1);
        info!(reason, "fetching new data from {}", self.source.name());

        let start = Instant::now();
        let result = self.aggregate(debug_run).await;
        Self::record_refresh(start, result.is_ok());

        let chart = result.inspect_err(|e| warn!(error = %e, "refresh failed, cache left as is"))?;
        let entry = CacheEntry::new(self.clock.now(), chart);
        let chart = Arc::clone(&entry.chart);
        self.cache.store(entry);

        Ok(chart)
    }

    /// Query every bucket and sum its ratings.
    ///
    /// The site session lives for the duration of this call only.
    async fn aggregate(&self, debug: bool) -> Result<ChartData> {
        let session = self.source.open_site(&self.config.site).await?;

        let mut values = [0.0; 4];
        for (value, bucket) in values.iter_mut().zip(Bucket::ALL) {
            let query = self.bucket_query(bucket, debug);
            let pages = session.search_pages(&query).await?;
            *value = sum_ratings(&pages);
            debug!(%bucket, tags = %query.tags, pages = pages.len(), value = *value, "bucket aggregated");
        }

        Ok(ChartData::from_values(values))
    }

    fn cache_hit(chart: Arc<ChartData>) -> Arc<ChartData> {
        metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
        info!("using cached chart data");
        chart
    }

    /// Record refresh outcome metrics (counter + histogram).
    fn record_refresh(start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::REFRESHES_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::REFRESH_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
    }
}
