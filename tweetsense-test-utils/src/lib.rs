//! TWEETSENSE Test Utilities
//!
//! Centralized test infrastructure for the Tweetsense workspace:
//! - Proptest generators for the record model
//! - Store and cache doubles that count calls or fail on demand
//! - Test fixtures for common scenarios

pub use tweetsense_core::{
    CacheError, ConfidenceScores, Sentence, Sentiment, StoreError, StoreResult, Tweet,
};
pub use tweetsense_storage::{InMemoryCache, InMemoryStore};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating tweet records.

    use super::*;
    use proptest::prelude::*;

    /// Generate a score in `[0, 1]` with three decimals, so it survives a
    /// JSON round trip exactly.
    pub fn arb_score() -> impl Strategy<Value = f64> {
        (0u32..=1000).prop_map(|n| n as f64 / 1000.0)
    }

    /// Generate a sentiment label.
    pub fn arb_label() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("positive".to_string()),
            Just("neutral".to_string()),
            Just("negative".to_string()),
            Just("mixed".to_string()),
        ]
    }

    /// Generate a non-empty tweet id.
    pub fn arb_tweet_id() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u64..1_000_000_000_000).prop_map(|n| n.to_string()),
            "[a-z0-9]{1,16}",
        ]
    }

    pub fn arb_confidence_scores() -> impl Strategy<Value = ConfidenceScores> {
        (arb_score(), arb_score(), arb_score())
            .prop_map(|(positive, neutral, negative)| ConfidenceScores::new(positive, neutral, negative))
    }

    pub fn arb_sentence() -> impl Strategy<Value = Sentence> {
        (arb_label(), arb_confidence_scores(), 0u32..280, 0u32..280, "\\PC{0,40}").prop_map(
            |(sentiment, confidence_scores, offset, length, text)| Sentence {
                sentiment,
                confidence_scores,
                offset,
                length,
                text,
            },
        )
    }

    pub fn arb_sentiment() -> impl Strategy<Value = Sentiment> {
        (
            arb_label(),
            arb_confidence_scores(),
            prop::collection::vec(arb_sentence(), 0..4),
        )
            .prop_map(|(sentiment, confidence_scores, sentences)| Sentiment {
                sentiment,
                confidence_scores,
                sentences,
            })
    }

    /// Generate a valid tweet.
    pub fn arb_tweet() -> impl Strategy<Value = Tweet> {
        (arb_tweet_id(), "\\PC{0,140}", arb_sentiment())
            .prop_map(|(id, text, sentiment)| Tweet { id, text, sentiment })
    }

    /// Generate a batch of tweets with distinct ids, in a random order.
    pub fn arb_tweet_batch(max: usize) -> impl Strategy<Value = Vec<Tweet>> {
        prop::collection::vec(arb_tweet(), 1..=max.max(1)).prop_map(|tweets| {
            let mut seen = std::collections::HashSet::new();
            tweets
                .into_iter()
                .filter(|tweet| seen.insert(tweet.id.clone()))
                .collect()
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records for common test scenarios.

    use super::*;

    /// A tweet with two sentences, distinguishable by id.
    pub fn sample_tweet(id: &str) -> Tweet {
        Tweet {
            id: id.to_string(),
            text: format!("Loving the new release! Docs could be better. #{}", id),
            sentiment: Sentiment {
                sentiment: "mixed".to_string(),
                confidence_scores: ConfidenceScores::new(0.55, 0.05, 0.4),
                sentences: vec![
                    Sentence {
                        sentiment: "positive".to_string(),
                        confidence_scores: ConfidenceScores::new(0.98, 0.01, 0.01),
                        offset: 0,
                        length: 24,
                        text: "Loving the new release!".to_string(),
                    },
                    Sentence {
                        sentiment: "negative".to_string(),
                        confidence_scores: ConfidenceScores::new(0.02, 0.1, 0.88),
                        offset: 25,
                        length: 20,
                        text: "Docs could be better.".to_string(),
                    },
                ],
            },
        }
    }

    /// One [`sample_tweet`] per id, in the given order.
    pub fn sample_tweets(ids: &[&str]) -> Vec<Tweet> {
        ids.iter().map(|id| sample_tweet(id)).collect()
    }

    /// Wire form of a tweet batch: `{ "data": [...] }`.
    pub fn data_envelope(tweets: &[Tweet]) -> serde_json::Value {
        serde_json::json!({ "data": tweets })
    }
}

// ============================================================================
// STORE AND CACHE DOUBLES
// ============================================================================

pub mod doubles {
    //! Wrappers around the in-memory backends for observing and breaking
    //! the services under test.

    use super::*;
    use async_trait::async_trait;
    use serde_json::Value as JsonValue;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tweetsense_core::CacheResult;
    use tweetsense_storage::{CacheStore, DocumentQuery, DocumentStore};

    fn injected(operation: &str) -> StoreError {
        StoreError::Unavailable {
            reason: format!("injected {} failure", operation),
        }
    }

    /// Document store that counts calls before delegating.
    #[derive(Debug, Clone)]
    pub struct CountingStore {
        inner: InMemoryStore,
        queries: Arc<AtomicUsize>,
        upserts: Arc<AtomicUsize>,
    }

    impl CountingStore {
        pub fn new(inner: InMemoryStore) -> Self {
            Self {
                inner,
                queries: Arc::new(AtomicUsize::new(0)),
                upserts: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }

        pub fn upserts(&self) -> usize {
            self.upserts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn query(&self, query: &DocumentQuery) -> StoreResult<Vec<JsonValue>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.query(query).await
        }

        async fn upsert(&self, document: JsonValue) -> StoreResult<()> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.inner.upsert(document).await
        }

        async fn ping(&self) -> StoreResult<()> {
            self.inner.ping().await
        }
    }

    /// Document store that fails selected calls.
    #[derive(Debug, Clone)]
    pub struct FailingStore {
        inner: InMemoryStore,
        /// 1-based index of the upsert call that fails.
        fail_upsert_at: Option<usize>,
        fail_queries: bool,
        fail_ping: bool,
        upserts: Arc<AtomicUsize>,
    }

    impl FailingStore {
        /// A store that fails nothing until configured.
        pub fn new(inner: InMemoryStore) -> Self {
            Self {
                inner,
                fail_upsert_at: None,
                fail_queries: false,
                fail_ping: false,
                upserts: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Fail the `nth` upsert (1-based). Later upserts succeed again.
        pub fn fail_upsert(mut self, nth: usize) -> Self {
            self.fail_upsert_at = Some(nth);
            self
        }

        pub fn fail_queries(mut self) -> Self {
            self.fail_queries = true;
            self
        }

        pub fn fail_ping(mut self) -> Self {
            self.fail_ping = true;
            self
        }

        /// Underlying store, for inspecting what was persisted.
        pub fn inner(&self) -> &InMemoryStore {
            &self.inner
        }
    }

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn query(&self, query: &DocumentQuery) -> StoreResult<Vec<JsonValue>> {
            if self.fail_queries {
                return Err(injected("query"));
            }
            self.inner.query(query).await
        }

        async fn upsert(&self, document: JsonValue) -> StoreResult<()> {
            let call = self.upserts.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_upsert_at == Some(call) {
                return Err(injected("upsert"));
            }
            self.inner.upsert(document).await
        }

        async fn ping(&self) -> StoreResult<()> {
            if self.fail_ping {
                return Err(injected("ping"));
            }
            self.inner.ping().await
        }
    }

    /// Cache whose every call fails with a connection error.
    #[derive(Debug, Clone, Default)]
    pub struct FailingCache;

    impl FailingCache {
        pub fn new() -> Self {
            Self
        }

        fn error() -> CacheError {
            CacheError::Connection {
                reason: "injected cache outage".to_string(),
            }
        }
    }

    #[async_trait]
    impl CacheStore for FailingCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(Self::error())
        }

        async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
            Err(Self::error())
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(Self::error())
        }

        async fn ping(&self) -> CacheResult<()> {
            Err(Self::error())
        }
    }
}
