//! Cache-aside read of the full tweet list.

use tweetsense_core::{StoreResult, Tweet};
use tweetsense_storage::{CacheGateway, CacheLookup, StoreGateway};

use super::observe_store;
use crate::config::CachePolicy;
use crate::telemetry::with_metrics;

/// Serves the tweet list from the cache when it can, from the store when
/// it must, and refills the cache after a store read.
#[derive(Clone)]
pub struct SentimentReadService {
    cache: CacheGateway,
    store: StoreGateway,
    policy: CachePolicy,
}

impl SentimentReadService {
    pub fn new(cache: CacheGateway, store: StoreGateway, policy: CachePolicy) -> Self {
        Self {
            cache,
            store,
            policy,
        }
    }

    /// Every stored tweet.
    ///
    /// A cached non-empty list is returned as is. Anything else (absent,
    /// empty, undecodable, cache down) falls through to the store. A
    /// non-empty store result is written back under the configured TTL;
    /// an empty one is not cached. Only store failures are returned.
    pub async fn get_all_sentiment_tweets(&self) -> StoreResult<Vec<Tweet>> {
        let lookup = self.cache.get_tweets().await;
        let outcome = lookup.outcome();
        with_metrics(|metrics| metrics.record_cache_lookup(outcome));

        match lookup {
            CacheLookup::Hit(tweets) => {
                tracing::debug!(count = tweets.len(), "Tweet list served from cache");
                return Ok(tweets);
            }
            CacheLookup::Miss | CacheLookup::Empty => {
                tracing::debug!(outcome, "Tweet list cache miss");
            }
            CacheLookup::Malformed(reason) => {
                tracing::warn!(reason = %reason, "Cached tweet list is unreadable, reading store");
            }
            CacheLookup::Unavailable(e) => {
                tracing::warn!(error = %e, "Cache unavailable, reading store");
            }
        }

        let tweets = observe_store("all_tweets", self.store.all_tweets()).await?;
        if tweets.is_empty() {
            return Ok(tweets);
        }

        match self.cache.set_tweets(&tweets, self.policy.ttl).await {
            Ok(()) => {
                with_metrics(|metrics| metrics.record_cache_write("set", true));
                tracing::debug!(
                    count = tweets.len(),
                    ttl_secs = self.policy.ttl.as_secs(),
                    "Tweet list cached"
                );
            }
            Err(e) => {
                with_metrics(|metrics| metrics.record_cache_write("set", false));
                tracing::warn!(error = %e, "Failed to cache tweet list");
            }
        }

        Ok(tweets)
    }
}
