//! Caching subsystem.
//!
//! [`ChartCache`] holds the most recent chart aggregation in a single slot.
//! Entries expire after a fixed TTL measured against an injected
//! [`Clock`](crate::clock::Clock); expiry is passive and only detected when
//! the slot is read.

pub mod chart;

pub use chart::{CacheConfig, CacheEntry, ChartCache};
