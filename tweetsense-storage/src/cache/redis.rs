//! Redis cache backend.
//!
//! Uses a single [`ConnectionManager`], which multiplexes commands over one
//! connection and reconnects on its own after a dropped connection. The
//! handle is cheap to clone, so each command works on a clone.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tweetsense_core::{CacheError, CacheResult};

use super::CacheStore;

/// Cache store backed by Redis.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis and verify the connection with a `PING`.
    ///
    /// Returns only once the server has answered, so a cache built here is
    /// ready to serve requests.
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url).map_err(|e| CacheError::Connection {
            reason: format!("invalid redis url: {}", e),
        })?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection {
                reason: e.to_string(),
            })?;

        let cache = Self { conn };
        cache.ping().await?;
        tracing::info!("Redis cache connected");
        Ok(cache)
    }
}

fn command_error(command: &str, err: redis::RedisError) -> CacheError {
    CacheError::Command {
        command: command.to_string(),
        reason: err.to_string(),
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        redis::cmd("GET")
            .arg(key)
            .query_async::<Option<String>>(&mut conn)
            .await
            .map_err(|e| command_error("GET", e))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        // EX 0 is rejected by Redis.
        let seconds = ttl.as_secs().max(1);
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(seconds)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| command_error("SET", e))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| command_error("DEL", e))
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| command_error("PING", e))
    }
}
