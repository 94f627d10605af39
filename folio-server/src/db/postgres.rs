//! Postgres-backed document store
//!
//! All collections share one `documents` table keyed by (collection, id),
//! with the document body in a JSONB column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::store::{DbError, Document, DocumentStore};
use crate::models::Collection;

/// Row shape shared by every query below
#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    data: JsonValue,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self, collection: Collection) -> Document {
        Document {
            id: self.id,
            collection,
            data: self.data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Document store over a Postgres pool
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: Collection, data: JsonValue) -> Result<Document, DbError> {
        let row: DocumentRow = sqlx::query_as(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            RETURNING id, data, created_at, updated_at
            "#,
        )
        .bind(collection.as_str())
        .bind(Uuid::new_v4())
        .bind(&data)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_document(collection))
    }

    async fn get(&self, collection: Collection, id: Uuid) -> Result<Document, DbError> {
        let row: DocumentRow = sqlx::query_as(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(collection, id))?;

        Ok(row.into_document(collection))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, DbError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_document(collection)).collect())
    }

    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        data: JsonValue,
    ) -> Result<Document, DbError> {
        let row: DocumentRow = sqlx::query_as(
            r#"
            UPDATE documents
            SET data = $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            RETURNING id, data, created_at, updated_at
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(&data)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(collection, id))?;

        Ok(row.into_document(collection))
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: Uuid,
        data: JsonValue,
    ) -> Result<Document, DbError> {
        let row: DocumentRow = sqlx::query_as(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE
            SET data = EXCLUDED.data,
                updated_at = NOW()
            RETURNING id, data, created_at, updated_at
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(&data)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_document(collection))
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(collection, id));
        }
        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, DbError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND data->>$2 = $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(collection.as_str())
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_document(collection)).collect())
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
