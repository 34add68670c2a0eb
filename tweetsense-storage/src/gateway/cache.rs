//! Cache gateway: the whole-list tweet cache entry.

use std::sync::Arc;
use std::time::Duration;
use tweetsense_core::{CacheError, CacheResult, Tweet};

use crate::cache::CacheStore;

/// Fixed key of the cached tweet list.
pub const TWEETS_CACHE_KEY: &str = "tweets";

/// Result of looking up the cached tweet list.
///
/// Only [`CacheLookup::Hit`] carries data; the other variants say why the
/// cache could not be used.
#[derive(Debug)]
pub enum CacheLookup {
    Hit(Vec<Tweet>),
    /// No entry under the key.
    Miss,
    /// The entry decoded to an empty list.
    Empty,
    /// The entry could not be decoded as a tweet list.
    Malformed(String),
    /// The cache backend failed.
    Unavailable(CacheError),
}

impl CacheLookup {
    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            CacheLookup::Hit(_) => "hit",
            CacheLookup::Miss => "miss",
            CacheLookup::Empty => "empty",
            CacheLookup::Malformed(_) => "malformed",
            CacheLookup::Unavailable(_) => "unavailable",
        }
    }
}

/// Reads and writes the cached tweet list.
#[derive(Clone)]
pub struct CacheGateway {
    cache: Arc<dyn CacheStore>,
}

impl CacheGateway {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }

    /// Look up the cached list. Never fails; failures become lookup variants.
    pub async fn get_tweets(&self) -> CacheLookup {
        let raw = match self.cache.get(TWEETS_CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => return CacheLookup::Unavailable(e),
        };

        match serde_json::from_str::<Vec<Tweet>>(&raw) {
            Ok(tweets) if tweets.is_empty() => CacheLookup::Empty,
            Ok(tweets) => CacheLookup::Hit(tweets),
            Err(e) => CacheLookup::Malformed(e.to_string()),
        }
    }

    /// Replace the cached list.
    pub async fn set_tweets(&self, tweets: &[Tweet], ttl: Duration) -> CacheResult<()> {
        let payload = serde_json::to_string(tweets).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        self.cache.set_ex(TWEETS_CACHE_KEY, &payload, ttl).await
    }

    /// Drop the cached list so the next read goes to the store.
    pub async fn invalidate(&self) -> CacheResult<()> {
        self.cache.delete(TWEETS_CACHE_KEY).await
    }

    pub async fn ping(&self) -> CacheResult<()> {
        self.cache.ping().await
    }
}
