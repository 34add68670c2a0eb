//! Store gateway: domain queries over the document store.

use serde_json::Value as JsonValue;
use std::sync::Arc;
use tweetsense_core::{
    DecodeError, IdOrdering, StoreError, StoreResult, Tweet, TweetDocument, TWEET_KIND,
};

use crate::store::{DocumentQuery, DocumentStore};

/// Translates "all tweets", "latest tweet id" and "upsert tweet" into
/// document store operations, decoding results into typed records.
#[derive(Clone)]
pub struct StoreGateway {
    store: Arc<dyn DocumentStore>,
}

impl StoreGateway {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every tweet record, in store order.
    ///
    /// A single undecodable document fails the whole call.
    pub async fn all_tweets(&self) -> StoreResult<Vec<Tweet>> {
        let documents = self.store.query(&DocumentQuery::kind(TWEET_KIND)).await?;
        documents
            .into_iter()
            .map(|doc| TweetDocument::decode(doc).map_err(StoreError::from))
            .collect()
    }

    /// Id of the greatest tweet under the given ordering, if any exist.
    ///
    /// Lexical ordering is pushed down to the store when it can order
    /// queries; otherwise every id is fetched and the maximum picked here.
    pub async fn latest_tweet_id(&self, ordering: IdOrdering) -> StoreResult<Option<String>> {
        let query = DocumentQuery::kind(TWEET_KIND).select_id();

        if ordering.is_store_native() && self.store.supports_ordered_queries() {
            let query = query.order_by_id_desc().limit(1);
            let documents = self.store.query(&query).await?;
            return documents.first().map(document_id).transpose();
        }

        let documents = self.store.query(&query).await?;
        let ids = documents
            .iter()
            .map(document_id)
            .collect::<StoreResult<Vec<String>>>()?;
        Ok(ordering.latest(ids))
    }

    /// Create or replace a tweet keyed by its id.
    pub async fn upsert_tweet(&self, tweet: &Tweet) -> StoreResult<()> {
        let document = TweetDocument::encode(tweet)?;
        self.store.upsert(document).await
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }
}

fn document_id(document: &JsonValue) -> StoreResult<String> {
    document
        .get("id")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            StoreError::Decode(DecodeError {
                id: None,
                reason: "document has no string 'id' field".to_string(),
            })
        })
}
