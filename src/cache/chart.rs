//! Single-slot TTL cache for chart aggregations.
//!
//! # Lifecycle
//!
//! ```text
//! Empty ──store──▶ Valid ──ttl elapses──▶ Stale ──store──▶ Valid
//! ```
//!
//! A failed refresh never reaches [`ChartCache::store`], so the slot keeps
//! whatever it held before. The whole entry is swapped under a write lock;
//! readers never see a partially written entry.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::types::ChartData;

/// Default validity window: 10 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Configuration for the chart cache.
///
/// ```rust
/// # use occon_chart::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new().ttl(Duration::from_secs(60));
/// assert_eq!(config.ttl, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry stays valid after creation. Default: 600s.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl CacheConfig {
    /// Create a new config with the default TTL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for the cached entry.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A cached aggregation and the instant it was produced.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub created_at: Instant,
    pub chart: Arc<ChartData>,
}

impl CacheEntry {
    pub fn new(created_at: Instant, chart: ChartData) -> Self {
        Self {
            created_at,
            chart: Arc::new(chart),
        }
    }

    /// Whether the entry is still inside its validity window at `now`.
    ///
    /// The window is half-open: an entry exactly `ttl` old is stale.
    pub fn is_valid(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) < ttl
    }
}

/// Thread-safe single-entry store for the latest chart aggregation.
pub struct ChartCache {
    ttl: Duration,
    slot: RwLock<Option<CacheEntry>>,
}

impl ChartCache {
    /// Create an empty cache.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            ttl: config.ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up the cached chart.
    ///
    /// Returns `None` when the slot is empty or the entry has expired at
    /// `now`.
    pub fn get(&self, now: Instant) -> Option<Arc<ChartData>> {
        self.peek()
            .filter(|entry| entry.is_valid(now, self.ttl))
            .map(|entry| entry.chart)
    }

    /// The current entry regardless of validity.
    pub fn peek(&self) -> Option<CacheEntry> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replace the slot with `entry`.
    pub fn store(&self, entry: CacheEntry) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = Some(entry);
    }

    /// Empty the slot.
    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Whether the slot currently holds an entry (valid or stale).
    pub fn is_empty(&self) -> bool {
        self.peek().is_none()
    }
}

impl Default for ChartCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_window_is_half_open() {
        let start = Instant::now();
        let entry = CacheEntry::new(start, ChartData::from_values([0.0; 4]));
        let ttl = Duration::from_secs(600);

        assert!(entry.is_valid(start, ttl));
        assert!(entry.is_valid(start + Duration::from_secs(599), ttl));
        assert!(!entry.is_valid(start + ttl, ttl));
        assert!(!entry.is_valid(start + Duration::from_secs(601), ttl));
    }

    #[test]
    fn entry_created_after_now_counts_as_fresh() {
        let now = Instant::now();
        let entry = CacheEntry::new(now + Duration::from_secs(5), ChartData::from_values([0.0; 4]));
        assert!(entry.is_valid(now, Duration::from_secs(1)));
    }
}
