//! Postgres-backed document store (one JSONB row per document)

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, Pool, Postgres};

use super::store::{Document, DocumentStore};
use crate::error::AppResult;

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Pool<Postgres>,
}

impl PgDocumentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let body = sqlx::query_scalar::<_, Json<Document>>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(body.map(|Json(document)| document))
    }

    async fn put(&self, collection: &str, id: &str, document: Document) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(document))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> AppResult<Option<Document>> {
        // jsonb || jsonb replaces top-level keys, matching the in-memory merge
        let body = sqlx::query_scalar::<_, Json<Document>>(
            r#"
            UPDATE documents SET body = body || $3
            WHERE collection = $1 AND id = $2
            RETURNING body
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(fields))
        .fetch_optional(&self.pool)
        .await?;
        Ok(body.map(|Json(document)| document))
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn scan(&self, collection: &str) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_scalar::<_, Json<Document>>(
            "SELECT body FROM documents WHERE collection = $1",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(document)| document).collect())
    }

    async fn add_clamped(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
        touch: Document,
    ) -> AppResult<Option<i64>> {
        // Single statement: the row lock serializes concurrent increments
        let value = sqlx::query_scalar::<_, Json<Value>>(
            r#"
            UPDATE documents
            SET body = jsonb_set(
                body || $5,
                ARRAY[$3::text],
                to_jsonb(GREATEST(0, COALESCE((body->>$3)::bigint, 0) + $4))
            )
            WHERE collection = $1 AND id = $2
            RETURNING body->$3
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(delta)
        .bind(Json(touch))
        .fetch_optional(&self.pool)
        .await?;
        Ok(value.and_then(|Json(v)| v.as_i64()))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
