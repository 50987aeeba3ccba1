//! Cache Module
//!
//! Best-effort acceleration in front of the disk. The cache is never a
//! source of truth: when the store is unreachable every operation becomes a
//! no-op and content is read from disk instead.

mod client;
mod handle;
mod redis;
mod stats;
mod store;


// Re-export public types
pub use client::{
    CacheClient, ConnectEvent, ConnectionState, DisabledConnector, MemoryConnector,
    RedisConnector, StoreConnector,
};
pub use handle::CacheHandle;
pub use self::redis::{redis_url, RedisStore};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::{KeyValueStore, MemoryStore, StoreError};
