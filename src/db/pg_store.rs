// src/db/pg_store.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, PgPool, Row};
use uuid::Uuid;

use crate::db::document_store::{Document, DocumentStore, StoreError};

/// Store de documentos sobre uma única tabela JSONB (`documents`).
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn ensure_object(fields: &Value) -> Result<(), StoreError> {
    if fields.is_object() {
        Ok(())
    } else {
        Err(StoreError::NotAnObject)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| -> Result<Document, StoreError> {
                let Json(data): Json<Value> = row.try_get("data")?;
                Ok(Document { id: row.try_get("id")?, data })
            })
            .collect()
    }

    async fn get_one(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let row = sqlx::query("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        let Json(data): Json<Value> = row.try_get("data")?;
        Ok(Document { id: row.try_get("id")?, data })
    }

    async fn create(&self, collection: &str, fields: Value) -> Result<String, StoreError> {
        ensure_object(&fields)?;
        let id = Uuid::new_v4().simple().to_string();

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(fields))
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, partial: Value) -> Result<(), StoreError> {
        ensure_object(&partial)?;

        // `||` no JSONB faz o merge raso das chaves de primeiro nível
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
            .bind(collection)
            .bind(id)
            .bind(Json(partial))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }
}
