//! Key-Value Store Module
//!
//! The primitive command set the cache layer needs from a backing store,
//! plus an in-process implementation with the same semantics.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

// == Store Error ==
/// Failures raised by a key-value backend.
///
/// These never cross the [`CacheHandle`](super::CacheHandle) boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A command was sent but failed
    #[error("Store command failed: {0}")]
    Command(String),
}

// == Key-Value Store ==
/// Scalar and set primitives of a remote key-value store.
///
/// Scalars map to `GET`/`SET`, sets to `SMEMBERS`/`SADD`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the scalar stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores a scalar, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Returns the members of the set under `key` (empty when missing).
    async fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Adds `member` to the set under `key`.
    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError>;

    /// Removes every key of every keyspace.
    async fn flushall(&self) -> Result<(), StoreError>;
}

// == Memory Store ==
#[derive(Debug, Default)]
struct Keyspaces {
    strings: HashMap<String, String>,
    /// Set members in insertion order
    sets: HashMap<String, Vec<String>>,
}

/// In-process store used by the `memory` backend and by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Keyspaces>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of keys across both keyspaces.
    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.strings.len() + inner.sets.len()
    }

    // == Is Empty ==
    /// Returns true if no key is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Delete ==
    /// Removes a scalar key, leaving sets untouched.
    ///
    /// Returns true if the key existed.
    pub async fn delete(&self, key: &str) -> bool {
        self.inner.write().await.strings.remove(key).is_some()
    }

    // == Delete Set ==
    /// Removes a set key, leaving scalars untouched.
    pub async fn delete_set(&self, key: &str) -> bool {
        self.inner.write().await.sets.remove(key).is_some()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.read().await.strings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .strings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .sets
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let members = inner.sets.entry(key.to_string()).or_default();
        if !members.iter().any(|m| m == member) {
            members.push(member.to_string());
        }
        Ok(())
    }

    async fn flushall(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.strings.clear();
        inner.sets.clear();
        Ok(())
    }
}
