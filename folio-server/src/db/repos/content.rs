//! Typed access to one content collection
//!
//! Encodes/decodes `Content` types to documents, enforces per-type unique
//! fields, and reports errors with the content type's resource name.

use std::marker::PhantomData;

use uuid::Uuid;

use crate::db::store::{DbError, Document, DocumentStore};
use crate::models::{sort_records, Content, Record};

/// Fixed id of single-document collections (hero, about, footer, settings)
pub const SINGLETON_ID: Uuid = Uuid::nil();

/// Content repository
pub struct ContentRepo<'a, T> {
    store: &'a dyn DocumentStore,
    _content: PhantomData<T>,
}

impl<'a, T: Content> ContentRepo<'a, T> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            _content: PhantomData,
        }
    }

    /// All records, in display order.
    pub async fn list(&self) -> Result<Vec<Record<T>>, DbError> {
        let docs = self.store.list(T::COLLECTION).await.map_err(rename::<T>)?;
        let mut records = docs.into_iter().map(decode::<T>).collect::<Result<Vec<_>, _>>()?;
        sort_records(&mut records);
        Ok(records)
    }

    pub async fn get(&self, id: Uuid) -> Result<Record<T>, DbError> {
        let doc = self.store.get(T::COLLECTION, id).await.map_err(rename::<T>)?;
        decode(doc)
    }

    /// Insert a new record. Clashing unique field → `DbError::Conflict`.
    pub async fn create(&self, content: T) -> Result<Record<T>, DbError> {
        self.ensure_unique(&content, None).await?;
        let data = serde_json::to_value(&content)?;
        let doc = self.store.insert(T::COLLECTION, data).await?;
        tracing::debug!(collection = %T::COLLECTION, id = %doc.id, "document created");
        decode(doc)
    }

    /// Overwrite one record in full.
    pub async fn replace(&self, id: Uuid, content: T) -> Result<Record<T>, DbError> {
        self.store.get(T::COLLECTION, id).await.map_err(rename::<T>)?;
        self.ensure_unique(&content, Some(id)).await?;

        let data = serde_json::to_value(&content)?;
        let doc = self
            .store
            .replace(T::COLLECTION, id, data)
            .await
            .map_err(rename::<T>)?;
        tracing::debug!(collection = %T::COLLECTION, %id, "document replaced");
        decode(doc)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.store
            .delete(T::COLLECTION, id)
            .await
            .map_err(rename::<T>)?;
        tracing::debug!(collection = %T::COLLECTION, %id, "document deleted");
        Ok(())
    }

    /// First record whose string `field` equals `value`.
    pub async fn find_one(&self, field: &str, value: &str) -> Result<Option<Record<T>>, DbError> {
        let docs = self.store.find_by_field(T::COLLECTION, field, value).await?;
        docs.into_iter().next().map(decode::<T>).transpose()
    }

    /// The single document of a singleton collection, if written yet.
    pub async fn get_singleton(&self) -> Result<Option<Record<T>>, DbError> {
        match self.store.get(T::COLLECTION, SINGLETON_ID).await {
            Ok(doc) => decode(doc).map(Some),
            Err(DbError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create or overwrite the singleton document.
    pub async fn put_singleton(&self, content: T) -> Result<Record<T>, DbError> {
        let data = serde_json::to_value(&content)?;
        let doc = self.store.upsert(T::COLLECTION, SINGLETON_ID, data).await?;
        tracing::debug!(collection = %T::COLLECTION, "singleton written");
        decode(doc)
    }

    async fn ensure_unique(&self, content: &T, own_id: Option<Uuid>) -> Result<(), DbError> {
        let Some((field, value)) = content.unique_key() else {
            return Ok(());
        };

        let clash = self
            .store
            .find_by_field(T::COLLECTION, field, &value)
            .await?
            .into_iter()
            .any(|doc| Some(doc.id) != own_id);

        if clash {
            return Err(DbError::Conflict {
                resource: T::RESOURCE,
                field,
                value,
            });
        }
        Ok(())
    }
}

fn decode<T: Content>(doc: Document) -> Result<Record<T>, DbError> {
    let content = serde_json::from_value(doc.data).map_err(|source| DbError::Decode {
        collection: doc.collection,
        id: doc.id,
        source,
    })?;

    Ok(Record {
        id: doc.id,
        content,
        created_at: doc.created_at,
        updated_at: doc.updated_at,
    })
}

/// Report store-level not-found errors under the content type's name.
fn rename<T: Content>(err: DbError) -> DbError {
    match err {
        DbError::NotFound { id, .. } => DbError::NotFound {
            resource: T::RESOURCE,
            id,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDocumentStore;
    use crate::models::{Blog, Hero, Service};

    fn blog(slug: &str) -> Blog {
        Blog {
            title: "Post".into(),
            slug: slug.into(),
            content: "Body".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_fields() {
        let store = MemoryDocumentStore::new();
        let repo = ContentRepo::<Blog>::new(&store);

        let created = repo.create(blog("first")).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched.content, blog("first"));
    }

    #[tokio::test]
    async fn unique_slug_conflicts() {
        let store = MemoryDocumentStore::new();
        let repo = ContentRepo::<Blog>::new(&store);

        repo.create(blog("same")).await.unwrap();
        let err = repo.create(blog("same")).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { field: "slug", .. }));
    }

    #[tokio::test]
    async fn replace_may_keep_own_slug() {
        let store = MemoryDocumentStore::new();
        let repo = ContentRepo::<Blog>::new(&store);

        let created = repo.create(blog("mine")).await.unwrap();
        let mut updated = blog("mine");
        updated.title = "Renamed".into();

        let replaced = repo.replace(created.id, updated).await.unwrap();
        assert_eq!(replaced.content.title, "Renamed");
    }

    #[tokio::test]
    async fn missing_record_uses_resource_name() {
        let store = MemoryDocumentStore::new();
        let repo = ContentRepo::<Service>::new(&store);

        let err = repo.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "service", .. }));
    }

    #[tokio::test]
    async fn list_sorts_by_position() {
        let store = MemoryDocumentStore::new();
        let repo = ContentRepo::<Service>::new(&store);

        for (title, order) in [("second", Some(2)), ("unordered", None), ("first", Some(1))] {
            repo.create(Service {
                title: title.into(),
                description: "d".into(),
                order,
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let titles: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.content.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "unordered"]);
    }

    #[tokio::test]
    async fn singleton_absent_until_written() {
        let store = MemoryDocumentStore::new();
        let repo = ContentRepo::<Hero>::new(&store);

        assert!(repo.get_singleton().await.unwrap().is_none());

        let hero = Hero {
            title: "Hi, I'm Ada".into(),
            ..Default::default()
        };
        repo.put_singleton(hero.clone()).await.unwrap();

        let stored = repo.get_singleton().await.unwrap().unwrap();
        assert_eq!(stored.id, SINGLETON_ID);
        assert_eq!(stored.content, hero);
    }
}
