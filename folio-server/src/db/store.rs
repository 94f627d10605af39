//! Document store abstraction
//!
//! Every content type lives in its own collection of flat JSON documents.
//! Handlers only ever touch one document per operation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::Collection;

/// Stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub collection: Collection,
    pub data: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} with {field} '{value}' already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("corrupt {collection} document '{id}': {source}")]
    Decode {
        collection: Collection,
        id: Uuid,
        source: serde_json::Error,
    },
}

impl DbError {
    pub(crate) fn not_found(collection: Collection, id: Uuid) -> Self {
        Self::NotFound {
            resource: collection.as_str(),
            id: id.to_string(),
        }
    }
}

/// CRUD over document collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document with a generated id.
    async fn insert(&self, collection: Collection, data: JsonValue) -> Result<Document, DbError>;

    /// Fetch one document. Missing → `DbError::NotFound`.
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Document, DbError>;

    /// All documents in a collection, newest first.
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, DbError>;

    /// Overwrite the data of an existing document. Missing → `DbError::NotFound`.
    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        data: JsonValue,
    ) -> Result<Document, DbError>;

    /// Create or overwrite the document with a caller-chosen id.
    async fn upsert(
        &self,
        collection: Collection,
        id: Uuid,
        data: JsonValue,
    ) -> Result<Document, DbError>;

    /// Remove a document. Missing → `DbError::NotFound`.
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), DbError>;

    /// Documents whose top-level string `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, DbError>;

    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> Result<(), DbError>;
}
