//! Cache Handle Module
//!
//! The capability set callers use. Every method is callable whatever the
//! state of the underlying connection: a degraded handle answers every read
//! with "absent" and ignores every write.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{CacheStats, KeyValueStore, StatsSnapshot};

#[derive(Clone)]
enum Backend {
    Ready(Arc<dyn KeyValueStore>),
    Degraded,
}

// == Cache Handle ==
/// Cheaply cloneable access to the content cache.
#[derive(Clone)]
pub struct CacheHandle {
    backend: Backend,
    stats: Arc<CacheStats>,
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("healthy", &self.is_healthy())
            .finish()
    }
}

impl CacheHandle {
    // == Constructors ==
    /// Binds the capability set to a live store.
    pub fn ready(store: Arc<dyn KeyValueStore>, stats: Arc<CacheStats>) -> Self {
        Self {
            backend: Backend::Ready(store),
            stats,
        }
    }

    /// A handle whose methods are all no-ops.
    pub fn degraded(stats: Arc<CacheStats>) -> Self {
        Self {
            backend: Backend::Degraded,
            stats,
        }
    }

    /// A degraded handle with its own counters.
    pub fn noop() -> Self {
        Self::degraded(Arc::new(CacheStats::new()))
    }

    // == Health ==
    /// True when bound to a live store.
    pub fn is_healthy(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    /// Current counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub(crate) fn record_fallback(&self) {
        self.stats.record_fallback();
    }

    // == String Get ==
    /// Looks up a scalar. Store failures read as a miss.
    pub async fn string_get(&self, key: &str) -> Option<String> {
        let Backend::Ready(store) = &self.backend else {
            self.stats.record_miss();
            return None;
        };

        match store.get(key).await {
            Ok(Some(value)) => {
                self.stats.record_hit();
                debug!(key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                self.stats.record_miss();
                debug!(key, "Cache miss");
                None
            }
            Err(err) => {
                self.stats.record_miss();
                self.stats.record_store_error();
                warn!(key, error = %err, "Cache read failed");
                None
            }
        }
    }

    // == String Set ==
    /// Stores a scalar. Failures are logged, never returned.
    pub async fn string_set(&self, key: &str, value: &str) {
        if let Backend::Ready(store) = &self.backend {
            if let Err(err) = store.set(key, value).await {
                self.stats.record_store_error();
                warn!(key, error = %err, "Cache write failed");
            }
        }
    }

    // == Array Get ==
    /// Returns the members stored under `key`, or None when degraded or failing.
    pub async fn array_get(&self, key: &str) -> Option<Vec<String>> {
        let Backend::Ready(store) = &self.backend else {
            return None;
        };

        match store.smembers(key).await {
            Ok(members) => Some(members),
            Err(err) => {
                self.stats.record_store_error();
                warn!(key, error = %err, "Cache set read failed");
                None
            }
        }
    }

    // == Array Add ==
    /// Adds a member to the set under `key`. Failures are logged.
    pub async fn array_add(&self, key: &str, value: &str) {
        if let Backend::Ready(store) = &self.backend {
            if let Err(err) = store.sadd(key, value).await {
                self.stats.record_store_error();
                warn!(key, error = %err, "Cache set write failed");
            }
        }
    }

    // == Flush All ==
    /// Clears both keyspaces. Failures are logged.
    pub async fn flush_all(&self) {
        if let Backend::Ready(store) = &self.backend {
            match store.flushall().await {
                Ok(()) => info!("Cache flushed"),
                Err(err) => {
                    self.stats.record_store_error();
                    warn!(error = %err, "Cache flush failed");
                }
            }
        }
    }
}
