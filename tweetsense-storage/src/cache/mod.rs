//! Cache store backends.
//!
//! A [`CacheStore`] is a plain string key/value store with per-entry
//! expiry. There is no check-and-set: callers do get-then-set and accept
//! that concurrent writers race (last writer wins).

pub mod memory;
pub mod redis;

pub use self::memory::InMemoryCache;
pub use self::redis::RedisCache;

use async_trait::async_trait;
use std::time::Duration;
use tweetsense_core::CacheResult;

/// Key/value cache backend with expiring entries.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get the value for a key, or `None` if absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Set a value that expires after `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Check that the cache is reachable.
    async fn ping(&self) -> CacheResult<()>;
}
