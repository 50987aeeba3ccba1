//! Cache Client Module
//!
//! Negotiates the store connection once per process and hands out the
//! resulting [`CacheHandle`].
//!
//! The connection lifecycle is a small state machine:
//!
//! ```text
//! Idle --Started--> Connecting --Ready--> Ready
//!                              \--Error--> Degraded
//! ```
//!
//! Ready and Degraded are terminal for the lifetime of the client. There is
//! no reconnect loop: a degraded client keeps serving from disk.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::cache::redis::{redis_url, RedisStore};
use crate::cache::{CacheHandle, CacheStats, KeyValueStore, MemoryStore, StoreError};
use crate::config::{CacheBackend, Config};

// == Connection State ==
/// Where the client is in its connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// No request has asked for the cache yet
    Idle,
    /// The first connect is in flight
    Connecting,
    /// Bound to a live store
    Ready,
    /// The store failed; every cache call is a no-op
    Degraded,
}

/// Events reported by the backend while connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectEvent {
    Started,
    Ready,
    Error,
}

impl ConnectionState {
    // == Transition ==
    /// Applies a backend event. Events that make no sense in the current
    /// state leave it unchanged.
    pub fn transition(self, event: ConnectEvent) -> Self {
        match (self, event) {
            (ConnectionState::Idle, ConnectEvent::Started) => ConnectionState::Connecting,
            (ConnectionState::Connecting, ConnectEvent::Ready) => ConnectionState::Ready,
            (ConnectionState::Connecting, ConnectEvent::Error) => ConnectionState::Degraded,
            (state, _) => state,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Ready => "ready",
            ConnectionState::Degraded => "degraded",
        };
        f.write_str(name)
    }
}

// == Store Connector ==
/// Opens a store. Resolves with whichever of "ready" or "error" the backend
/// reports first.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    async fn connect(&self) -> Result<Arc<dyn KeyValueStore>, StoreError>;
}

/// Connects to Redis.
pub struct RedisConnector {
    url: String,
}

impl RedisConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl StoreConnector for RedisConnector {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn connect(&self) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        let store = RedisStore::connect(&self.url).await?;
        Ok(Arc::new(store))
    }
}

/// Hands out a shared in-process store.
#[derive(Default)]
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn connect(&self) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        Ok(self.store.clone())
    }
}

/// Always fails, leaving the client degraded.
pub struct DisabledConnector;

#[async_trait]
impl StoreConnector for DisabledConnector {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn connect(&self) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        Err(StoreError::Unavailable("cache backend disabled".to_string()))
    }
}

// == Cache Client ==
/// Owns the one cache connection of a server.
pub struct CacheClient {
    connector: Arc<dyn StoreConnector>,
    /// Shared by every concurrent first caller until it settles
    handle: OnceCell<CacheHandle>,
    state: Mutex<ConnectionState>,
    flushed: AtomicBool,
    stats: Arc<CacheStats>,
}

impl CacheClient {
    // == Constructors ==
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            connector,
            handle: OnceCell::new(),
            state: Mutex::new(ConnectionState::Idle),
            flushed: AtomicBool::new(false),
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Builds the connector selected by `MM_CACHE_BACKEND`.
    pub fn from_config(config: &Config) -> Self {
        let connector: Arc<dyn StoreConnector> = match config.cache_backend {
            CacheBackend::Redis => Arc::new(RedisConnector::new(redis_url(
                &config.redis_host,
                config.redis_port,
                config.redis_password.as_deref(),
            ))),
            CacheBackend::Memory => Arc::new(MemoryConnector::default()),
            CacheBackend::None => Arc::new(DisabledConnector),
        };
        Self::new(connector)
    }

    /// Backed by the given in-process store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self::new(Arc::new(MemoryConnector::new(store)))
    }

    /// Permanently degraded.
    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledConnector))
    }

    // == State ==
    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current counters.
    pub fn stats(&self) -> crate::cache::StatsSnapshot {
        self.stats.snapshot()
    }

    fn apply(&self, event: ConnectEvent) -> ConnectionState {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = state.transition(event);
        *state
    }

    // == Connect ==
    /// Returns the process-wide handle, connecting on first use.
    ///
    /// With `should_flush`, the first call that finds a live store clears it;
    /// later calls never flush again.
    pub async fn connect(&self, should_flush: bool) -> CacheHandle {
        let handle = self.handle.get_or_init(|| self.establish()).await.clone();

        if should_flush && handle.is_healthy() && !self.flushed.swap(true, Ordering::SeqCst) {
            handle.flush_all().await;
        }

        handle
    }

    async fn establish(&self) -> CacheHandle {
        self.apply(ConnectEvent::Started);
        info!(backend = self.connector.name(), "Connecting to cache store");

        match self.connector.connect().await {
            Ok(store) => {
                let state = self.apply(ConnectEvent::Ready);
                info!(backend = self.connector.name(), %state, "Cache store ready");
                CacheHandle::ready(store, self.stats.clone())
            }
            Err(err) => {
                let state = self.apply(ConnectEvent::Error);
                warn!(
                    backend = self.connector.name(),
                    %state,
                    error = %err,
                    "Cache store unavailable, serving without cache"
                );
                CacheHandle::degraded(self.stats.clone())
            }
        }
    }
}
