use super::{ensure_id, matches_filter, Document, DocumentStore, StoreResult, ID_FIELD};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process document store, used by tests and embedded deployments
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents stored in `collection`
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn find_one(&self, collection: &str, filter: &Document) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| matches_filter(d, filter)))
            .cloned())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Document,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| matches_filter(d, filter))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn save(&self, collection: &str, mut document: Document) -> StoreResult<String> {
        let id = ensure_id(&mut document)?;
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let existing = documents
            .iter_mut()
            .find(|d| d.get(ID_FIELD) == Some(&Value::String(id.clone())));
        match existing {
            Some(slot) => *slot = document,
            None => documents.push(document),
        }

        Ok(id)
    }
}
