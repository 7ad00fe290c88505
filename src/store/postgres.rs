use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{Document, DocumentStore, Precondition, StoreError, WriteBatch, WriteOp};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Postgres-backed document store. Every collection lives in one
/// `documents(collection, id, data jsonb)` table; batches run inside a
/// transaction, with precondition rows locked `FOR UPDATE` before any write.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_document(row: sqlx::postgres::PgRow) -> Document {
    Document {
        id: row.get("id"),
        data: row.get("data"),
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query("SELECT id, data FROM documents WHERE collection = $1 ORDER BY id")
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(row_to_document).collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(row_to_document))
    }

    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(&data)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
             ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data",
        )
        .bind(collection)
        .bind(id)
        .bind(&data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(&fields)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, data FROM documents
             WHERE collection = $1 AND data -> $2 = $3 ORDER BY id",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_document).collect())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for precondition in &batch.preconditions {
            let Precondition::FieldEquals {
                collection,
                id,
                field,
                value,
            } = precondition;
            let row = sqlx::query(
                "SELECT data -> $3 AS field FROM documents
                 WHERE collection = $1 AND id = $2 FOR UPDATE",
            )
            .bind(collection)
            .bind(id)
            .bind(field)
            .fetch_optional(&mut *tx)
            .await?;
            let current: Option<Value> = row.and_then(|row| row.get("field"));
            if current.as_ref() != Some(value) {
                tx.rollback().await?;
                return Err(StoreError::PreconditionFailed);
            }
        }

        for op in &batch.ops {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    data,
                } => {
                    sqlx::query(
                        "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
                         ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data",
                    )
                    .bind(collection)
                    .bind(id)
                    .bind(data)
                    .execute(&mut *tx)
                    .await?;
                }
                WriteOp::Update {
                    collection,
                    id,
                    fields,
                } => {
                    let result = sqlx::query(
                        "UPDATE documents SET data = data || $3
                         WHERE collection = $1 AND id = $2",
                    )
                    .bind(collection)
                    .bind(id)
                    .bind(fields)
                    .execute(&mut *tx)
                    .await?;
                    if result.rows_affected() == 0 {
                        tx.rollback().await?;
                        return Err(StoreError::NotFound);
                    }
                }
                WriteOp::Delete { collection, id } => {
                    sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                        .bind(collection)
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
