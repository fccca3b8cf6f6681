//! Cache-wide configuration, per-subscription options and statistics.

use std::time::Duration;

/// Configuration for a [`QueryCache`](crate::QueryCache).
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry with no subscribers is kept before eviction.
    pub gc_time: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            gc_time: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grace period before unused entries are evicted.
    pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }
}

/// Options a consumer passes to [`QueryCache::subscribe`](crate::QueryCache::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryOptions {
    /// Period between background refetches. Zero disables polling.
    pub refetch_interval: Duration,
    /// How long fetched data counts as fresh.
    pub stale_time: Duration,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = interval;
        self
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn polls(&self) -> bool {
        !self.refetch_interval.is_zero()
    }
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Subscriptions served from fresh data without a fetch.
    pub hits: u64,
    /// Subscriptions that found no entry.
    pub misses: u64,
    /// Subscriptions served stale data while a refetch ran.
    pub stale_hits: u64,
    /// Subscriptions that joined a fetch already in flight.
    pub deduplicated: u64,
    /// Producer invocations started.
    pub fetches: u64,
    /// Producer invocations that failed.
    pub failures: u64,
    /// Results dropped because a newer fetch superseded them.
    pub discarded: u64,
    /// Entries removed after their grace period.
    pub evictions: u64,
    /// Number of entries currently in cache.
    pub entry_count: u64,
}

impl CacheStats {
    /// Share of subscriptions answered without waiting on a fetch (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let served = self.hits + self.stale_hits;
        let total = served + self.misses + self.deduplicated;
        if total == 0 {
            0.0
        } else {
            served as f64 / total as f64
        }
    }
}
