//! Persisting submitted tweets.

use thiserror::Error;
use tweetsense_core::{StoreError, Tweet};
use tweetsense_storage::{CacheGateway, StoreGateway};

use super::observe_store;
use crate::config::CachePolicy;
use crate::telemetry::with_metrics;

/// Outcome of a fully persisted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    pub persisted: usize,
    /// Whether the cached list was dropped afterwards.
    pub cache_invalidated: bool,
}

/// A batch stopped at the first failing upsert.
///
/// Tweets before `failed_id` in the batch stay persisted; nothing is rolled back.
#[derive(Debug, Error)]
#[error("failed to persist tweet '{failed_id}' after {persisted} of {total}: {source}")]
pub struct WriteError {
    pub persisted: usize,
    pub total: usize,
    pub failed_id: String,
    #[source]
    pub source: StoreError,
}

/// Upserts submitted tweets one at a time, in order.
#[derive(Clone)]
pub struct SentimentWriteService {
    cache: CacheGateway,
    store: StoreGateway,
    policy: CachePolicy,
}

impl SentimentWriteService {
    pub fn new(cache: CacheGateway, store: StoreGateway, policy: CachePolicy) -> Self {
        Self {
            cache,
            store,
            policy,
        }
    }

    /// Upsert every tweet in input order, stopping at the first failure.
    ///
    /// The cache is left alone unless the policy asks for invalidation, in
    /// which case a completed batch is followed by a best-effort delete.
    pub async fn submit_tweets(&self, tweets: &[Tweet]) -> Result<WriteReport, WriteError> {
        let total = tweets.len();

        for (index, tweet) in tweets.iter().enumerate() {
            if let Err(source) = observe_store("upsert_tweet", self.store.upsert_tweet(tweet)).await {
                return Err(WriteError {
                    persisted: index,
                    total,
                    failed_id: tweet.id.clone(),
                    source,
                });
            }
        }

        tracing::info!(count = total, "Tweets persisted");

        let cache_invalidated = self.policy.invalidate_on_write && total > 0 && self.invalidate().await;

        Ok(WriteReport {
            persisted: total,
            cache_invalidated,
        })
    }

    async fn invalidate(&self) -> bool {
        match self.cache.invalidate().await {
            Ok(()) => {
                with_metrics(|metrics| metrics.record_cache_write("invalidate", true));
                tracing::debug!("Tweet list cache invalidated");
                true
            }
            Err(e) => {
                with_metrics(|metrics| metrics.record_cache_write("invalidate", false));
                tracing::warn!(error = %e, "Failed to invalidate tweet list cache");
                false
            }
        }
    }
}
