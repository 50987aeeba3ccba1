//! Redis Backend
//!
//! [`KeyValueStore`] over a multiplexed Redis connection.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::cache::{KeyValueStore, StoreError};

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Command(err.to_string())
    }
}

// == Redis Store ==
/// Redis-backed store. Cloning the manager is cheap and shares the connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Opens a connection to `url` and waits until it is ready.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|err| StoreError::Unavailable(err.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn.smembers(key).await?;
        Ok(members)
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.sadd(key, member).await?;
        Ok(())
    }

    async fn flushall(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHALL").query_async(&mut conn).await?;
        Ok(())
    }
}

/// Builds a `redis://` URL from host, port and optional password.
pub fn redis_url(host: &str, port: u16, password: Option<&str>) -> String {
    match password {
        Some(password) => format!("redis://:{}@{}:{}/", password, host, port),
        None => format!("redis://{}:{}/", host, port),
    }
}
