//! In-process document store
//!
//! Used by tests and by `folio serve --memory` for local previews.
//! Contents are lost on restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::store::{DbError, Document, DocumentStore};
use crate::models::Collection;

/// Document plus insertion sequence, used to break timestamp ties
#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    doc: Document,
}

/// HashMap-backed document store
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<HashMap<(Collection, Uuid), Entry>>,
    next_seq: AtomicU64,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<(Collection, Uuid), Entry>> {
        self.docs.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<(Collection, Uuid), Entry>> {
        self.docs.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    fn newest_first(mut entries: Vec<Entry>) -> Vec<Document> {
        entries.sort_by(|a, b| {
            b.doc
                .created_at
                .cmp(&a.doc.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        entries.into_iter().map(|e| e.doc).collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: Collection, data: JsonValue) -> Result<Document, DbError> {
        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4(),
            collection,
            data,
            created_at: now,
            updated_at: now,
        };
        let entry = Entry {
            seq: self.seq(),
            doc: doc.clone(),
        };
        self.write().insert((collection, doc.id), entry);
        Ok(doc)
    }

    async fn get(&self, collection: Collection, id: Uuid) -> Result<Document, DbError> {
        self.read()
            .get(&(collection, id))
            .map(|e| e.doc.clone())
            .ok_or_else(|| DbError::not_found(collection, id))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, DbError> {
        let entries = self
            .read()
            .values()
            .filter(|e| e.doc.collection == collection)
            .cloned()
            .collect();
        Ok(Self::newest_first(entries))
    }

    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        data: JsonValue,
    ) -> Result<Document, DbError> {
        let mut docs = self.write();
        let entry = docs
            .get_mut(&(collection, id))
            .ok_or_else(|| DbError::not_found(collection, id))?;
        entry.doc.data = data;
        entry.doc.updated_at = Utc::now();
        Ok(entry.doc.clone())
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: Uuid,
        data: JsonValue,
    ) -> Result<Document, DbError> {
        let seq = self.seq();
        let now = Utc::now();
        let mut docs = self.write();
        let entry = docs.entry((collection, id)).or_insert_with(|| Entry {
            seq,
            doc: Document {
                id,
                collection,
                data: JsonValue::Null,
                created_at: now,
                updated_at: now,
            },
        });
        entry.doc.data = data;
        entry.doc.updated_at = now;
        Ok(entry.doc.clone())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), DbError> {
        self.write()
            .remove(&(collection, id))
            .map(|_| ())
            .ok_or_else(|| DbError::not_found(collection, id))
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, DbError> {
        let entries = self
            .read()
            .values()
            .filter(|e| e.doc.collection == collection)
            .filter(|e| e.doc.data.get(field).and_then(JsonValue::as_str) == Some(value))
            .cloned()
            .collect();
        Ok(Self::newest_first(entries))
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn created_document_is_retrievable() {
        let store = MemoryDocumentStore::new();
        let doc = store
            .insert(Collection::Quotes, json!({"text": "Ship it", "author": "Ada"}))
            .await
            .unwrap();

        let fetched = store.get(Collection::Quotes, doc.id).await.unwrap();
        assert_eq!(fetched, doc);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryDocumentStore::new();
        let doc = store.insert(Collection::Quotes, json!({})).await.unwrap();

        assert!(matches!(
            store.get(Collection::Blogs, doc.id).await,
            Err(DbError::NotFound { resource: "blogs", .. })
        ));
        assert!(store.list(Collection::Blogs).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_touches_only_target() {
        let store = MemoryDocumentStore::new();
        let a = store.insert(Collection::Services, json!({"title": "a"})).await.unwrap();
        let b = store.insert(Collection::Services, json!({"title": "b"})).await.unwrap();

        let replaced = store
            .replace(Collection::Services, a.id, json!({"title": "a2"}))
            .await
            .unwrap();
        assert_eq!(replaced.data["title"], "a2");
        assert_eq!(replaced.created_at, a.created_at);
        assert!(replaced.updated_at >= a.updated_at);

        let untouched = store.get(Collection::Services, b.id).await.unwrap();
        assert_eq!(untouched, b);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::new_v4();

        assert!(matches!(
            store.replace(Collection::Wall, id, json!({})).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete(Collection::Wall, id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn upsert_creates_then_overwrites() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::nil();

        let first = store.upsert(Collection::Hero, id, json!({"title": "v1"})).await.unwrap();
        let second = store.upsert(Collection::Hero, id, json!({"title": "v2"})).await.unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.data["title"], "v2");
        assert_eq!(store.list(Collection::Hero).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryDocumentStore::new();
        let first = store.insert(Collection::Quotes, json!({"n": 1})).await.unwrap();
        let second = store.insert(Collection::Quotes, json!({"n": 2})).await.unwrap();

        let ids: Vec<_> = store
            .list(Collection::Quotes)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn find_by_field_matches_strings_only() {
        let store = MemoryDocumentStore::new();
        store
            .insert(Collection::Subscribers, json!({"email": "a@example.com"}))
            .await
            .unwrap();
        store
            .insert(Collection::Subscribers, json!({"email": "b@example.com"}))
            .await
            .unwrap();

        let hits = store
            .find_by_field(Collection::Subscribers, "email", "a@example.com")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let none = store
            .find_by_field(Collection::Subscribers, "missing", "a@example.com")
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
