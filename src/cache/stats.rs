//! Cache Statistics Module
//!
//! Tracks how often content came from the cache versus its fallback.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Lock-free counters shared by every clone of a cache handle.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    fallbacks: AtomicU64,
    store_errors: AtomicU64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Fallback ==
    /// Increments the counter of fallback producer invocations.
    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Store Error ==
    /// Increments the counter of swallowed store failures.
    pub fn record_store_error(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Returns a point-in-time copy of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot::new(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.fallbacks.load(Ordering::Relaxed),
            self.store_errors.load(Ordering::Relaxed),
        )
    }
}

// == Stats Snapshot ==
/// Serializable view of [`CacheStats`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub fallbacks: u64,
    pub store_errors: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl StatsSnapshot {
    pub fn new(hits: u64, misses: u64, fallbacks: u64, store_errors: u64) -> Self {
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };
        Self {
            hits,
            misses,
            fallbacks,
            store_errors,
            hit_rate,
        }
    }
}
