//! Document store backends.
//!
//! A [`DocumentStore`] holds schema-less JSON documents in a shared
//! collection. Records of different kinds are told apart by the
//! `type` discriminator, so every query is scoped to one kind.

pub mod cosmos;
pub mod memory;

pub use cosmos::{CosmosConfig, CosmosStore};
pub use memory::InMemoryStore;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tweetsense_core::{StoreResult, DISCRIMINATOR_FIELD};

/// A filtered query over one record kind.
///
/// Results come back in store order unless [`DocumentQuery::order_by_id_desc`]
/// is set, in which case they are sorted by `id` as strings, descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    /// Value the discriminator field must equal.
    pub kind: String,
    pub order_by_id_desc: bool,
    pub limit: Option<usize>,
    /// Return only the `id` field of each document.
    pub select_id_only: bool,
}

impl DocumentQuery {
    /// All documents of the given kind.
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            order_by_id_desc: false,
            limit: None,
            select_id_only: false,
        }
    }

    pub fn order_by_id_desc(mut self) -> Self {
        self.order_by_id_desc = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn select_id(mut self) -> Self {
        self.select_id_only = true;
        self
    }

    /// Render as Cosmos DB SQL. The kind is bound as the `@kind` parameter.
    pub fn to_sql(&self) -> String {
        let mut sql = String::from("SELECT ");
        if let Some(limit) = self.limit {
            sql.push_str(&format!("TOP {} ", limit));
        }
        sql.push_str(if self.select_id_only { "c.id" } else { "*" });
        sql.push_str(&format!(" FROM c WHERE c[\"{}\"] = @kind", DISCRIMINATOR_FIELD));
        if self.order_by_id_desc {
            sql.push_str(" ORDER BY c.id DESC");
        }
        sql
    }
}

/// Storage backend for raw documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a filtered query and return the matching raw documents.
    async fn query(&self, query: &DocumentQuery) -> StoreResult<Vec<JsonValue>>;

    /// Create or replace a single document, keyed by its `id` field.
    async fn upsert(&self, document: JsonValue) -> StoreResult<()>;

    /// Check that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Whether a kind-filtered query with `ORDER BY` and `TOP` can be served
    /// by the store itself. When this is `false`, callers must project the
    /// rows and order them client-side.
    fn supports_ordered_queries(&self) -> bool {
        true
    }
}
