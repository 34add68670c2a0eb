//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use tweetsense_core::IdOrdering;
use tweetsense_storage::{CacheGateway, CacheStore, DocumentStore, StoreGateway};

use crate::config::CachePolicy;
use crate::services::{LatestTweetService, SentimentReadService, SentimentWriteService};

/// Application-wide state shared across all routes.
///
/// Every field is a cheap handle; the backends behind them are shared.
#[derive(Clone)]
pub struct AppState {
    pub read: SentimentReadService,
    pub write: SentimentWriteService,
    pub latest: LatestTweetService,
    /// Direct gateway handles for readiness checks.
    pub store: StoreGateway,
    pub cache: CacheGateway,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the services over already-connected backends.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn CacheStore>,
        policy: CachePolicy,
        ordering: IdOrdering,
    ) -> Self {
        let store = StoreGateway::new(store);
        let cache = CacheGateway::new(cache);

        Self {
            read: SentimentReadService::new(cache.clone(), store.clone(), policy),
            write: SentimentWriteService::new(cache.clone(), store.clone(), policy),
            latest: LatestTweetService::new(store.clone(), ordering),
            store,
            cache,
            start_time: Instant::now(),
        }
    }
}
