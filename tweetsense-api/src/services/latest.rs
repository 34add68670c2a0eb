//! Id of the most recently stored tweet.

use tweetsense_core::{IdOrdering, StoreResult};
use tweetsense_storage::StoreGateway;

use super::observe_store;

#[derive(Clone)]
pub struct LatestTweetService {
    store: StoreGateway,
    ordering: IdOrdering,
}

impl LatestTweetService {
    pub fn new(store: StoreGateway, ordering: IdOrdering) -> Self {
        Self { store, ordering }
    }

    pub fn ordering(&self) -> IdOrdering {
        self.ordering
    }

    /// Greatest stored tweet id under the configured ordering. Always read
    /// from the store; the cache is not consulted.
    pub async fn get_latest_tweet_id(&self) -> StoreResult<Option<String>> {
        observe_store("latest_tweet_id", self.store.latest_tweet_id(self.ordering)).await
    }
}
