//! Schemaless document storage.
//!
//! Documents are JSON objects addressed by a string `_id`. Stores support
//! filtered lookups and upsert saves; the persistence driver is written
//! against the [`DocumentStore`] trait so PostgreSQL and the in-memory store
//! are interchangeable.

pub mod memory;
pub mod pool;

pub use memory::MemoryDocumentStore;
pub use pool::{create_pool, run_migrations, PgDocumentStore, MIGRATOR};

use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// A stored document
pub type Document = Map<String, Value>;

/// Key holding the document identifier
pub const ID_FIELD: &str = "_id";

/// Errors that can occur when working with the document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to create database pool: {0}")]
    PoolCreation(sqlx::Error),

    #[error("Database query error: {0}")]
    Query(sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid document id: {0}")]
    InvalidId(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Query(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Generic document store.
///
/// `save` has upsert semantics: a document without `_id` (or with a null one)
/// gets a fresh identifier, otherwise the stored document with that id is
/// replaced.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// First document in `collection` matching `filter`
    async fn find_one(&self, collection: &str, filter: &Document) -> StoreResult<Option<Document>>;

    /// Up to `limit` documents matching `filter`, in insertion order
    async fn find(
        &self,
        collection: &str,
        filter: &Document,
        limit: usize,
    ) -> StoreResult<Vec<Document>>;

    /// Insert or replace `document`, returning its identifier
    async fn save(&self, collection: &str, document: Document) -> StoreResult<String>;
}

/// Filter selecting a single document by identifier
pub fn id_filter(id: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    filter
}

/// Filter on a single field equality
pub fn field_filter(field: &str, value: impl Into<Value>) -> Document {
    let mut filter = Document::new();
    filter.insert(field.to_string(), value.into());
    filter
}

/// Read the identifier of `document`, generating one when absent or null
pub fn ensure_id(document: &mut Document) -> StoreResult<String> {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) => Ok(id.clone()),
        None | Some(Value::Null) => {
            let id = Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(id)
        }
        Some(other) => Err(StoreError::InvalidId(other.to_string())),
    }
}

/// True when every top-level field of `filter` equals the document's value
pub fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_ensure_id_generates_when_missing() {
        let mut document = doc(json!({"owner": "u1"}));
        let id = ensure_id(&mut document).unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(document.get(ID_FIELD), Some(&Value::String(id)));
    }

    #[test]
    fn test_ensure_id_replaces_null() {
        let mut document = doc(json!({"_id": null}));
        let id = ensure_id(&mut document).unwrap();
        assert!(!id.is_empty());
    }

    #[test]
    fn test_ensure_id_keeps_existing() {
        let mut document = doc(json!({"_id": "abc"}));
        assert_eq!(ensure_id(&mut document).unwrap(), "abc");
    }

    #[test]
    fn test_ensure_id_rejects_non_string() {
        let mut document = doc(json!({"_id": 12}));
        assert!(matches!(ensure_id(&mut document), Err(StoreError::InvalidId(_))));
    }

    #[test]
    fn test_matches_filter() {
        let document = doc(json!({"_id": "a", "owner": "u1", "title": "x"}));
        assert!(matches_filter(&document, &field_filter("owner", "u1")));
        assert!(matches_filter(&document, &id_filter("a")));
        assert!(!matches_filter(&document, &field_filter("owner", "u2")));
        assert!(matches_filter(&document, &Document::new()));
    }
}
