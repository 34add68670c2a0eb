//! In-memory document store for tests.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::RwLock;
use tweetsense_core::{StoreError, StoreResult, DISCRIMINATOR_FIELD};

use super::{DocumentQuery, DocumentStore};

/// Document store kept in a vector.
///
/// Documents stay in insertion order; an upsert of an existing `id`
/// replaces the document in place.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    documents: Arc<RwLock<Vec<JsonValue>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents of every kind.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Snapshot of all documents in store order.
    pub async fn documents(&self) -> Vec<JsonValue> {
        self.documents.read().await.clone()
    }

    /// Remove every document.
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }
}

fn document_id(document: &JsonValue) -> Option<&str> {
    document.get("id").and_then(JsonValue::as_str)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn query(&self, query: &DocumentQuery) -> StoreResult<Vec<JsonValue>> {
        let documents = self.documents.read().await;

        let mut matching: Vec<JsonValue> = documents
            .iter()
            .filter(|doc| {
                doc.get(DISCRIMINATOR_FIELD).and_then(JsonValue::as_str) == Some(query.kind.as_str())
            })
            .cloned()
            .collect();

        if query.order_by_id_desc {
            matching.sort_by(|a, b| document_id(b).cmp(&document_id(a)));
        }

        if let Some(limit) = query.limit {
            matching.truncate(limit);
        }

        if query.select_id_only {
            matching = matching
                .into_iter()
                .map(|doc| serde_json::json!({ "id": doc.get("id").cloned() }))
                .collect();
        }

        Ok(matching)
    }

    async fn upsert(&self, document: JsonValue) -> StoreResult<()> {
        let id = document_id(&document)
            .ok_or_else(|| StoreError::Request {
                operation: "upsert".to_string(),
                reason: "document has no string 'id' field".to_string(),
            })?
            .to_string();

        let mut documents = self.documents.write().await;
        match documents
            .iter_mut()
            .find(|existing| document_id(existing) == Some(id.as_str()))
        {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
