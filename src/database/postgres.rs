use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::{AdminCredential, Collection, Section};
use crate::database::store::{order_of, PortfolioStore};

/// PostgreSQL-backed store. Content documents live in JSONB columns.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioStore for PgStore {
    async fn admin_exists(&self) -> Result<bool, DatabaseError> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM admin_credentials) AS present")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("present")?)
    }

    async fn find_admin(&self, username: &str) -> Result<Option<AdminCredential>, DatabaseError> {
        let admin = sqlx::query_as::<_, AdminCredential>(
            "SELECT id, username, password_hash FROM admin_credentials WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn insert_admin(&self, credential: AdminCredential) -> Result<(), DatabaseError> {
        // The UNIQUE singleton column turns a concurrent second insert into a conflict.
        let result = sqlx::query(
            "INSERT INTO admin_credentials (id, username, password_hash) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(credential.id)
        .bind(&credential.username)
        .bind(&credential.password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::AlreadyExists("admin".to_string()));
        }
        Ok(())
    }

    async fn get_section(&self, section: Section) -> Result<Option<Value>, DatabaseError> {
        let row = sqlx::query("SELECT document FROM portfolio_sections WHERE name = $1")
            .bind(section.as_str())
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(row.try_get("document")?)),
            None => Ok(None),
        }
    }

    async fn replace_section(&self, section: Section, document: Value) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO portfolio_sections (name, document) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET document = EXCLUDED.document, updated_at = now()",
        )
        .bind(section.as_str())
        .bind(&document)
        .execute(&self.pool)
        .await?;
        debug!("Replaced section {}", section.as_str());
        Ok(())
    }

    async fn list_items(&self, collection: Collection, limit: usize) -> Result<Vec<Value>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT document FROM portfolio_items WHERE collection = $1 \
             ORDER BY position ASC, seq ASC LIMIT $2",
        )
        .bind(collection.as_str())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<Value, _>("document").map_err(DatabaseError::from))
            .collect()
    }

    async fn insert_item(&self, collection: Collection, id: &str, document: Value) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO portfolio_items (collection, id, position, document) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (collection, id) DO NOTHING",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(order_of(&document))
        .bind(&document)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::AlreadyExists(format!("{}/{}", collection.as_str(), id)));
        }
        Ok(())
    }

    async fn replace_item(&self, collection: Collection, id: &str, document: Value) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE portfolio_items SET document = $3, position = $4 WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(&document)
        .bind(order_of(&document))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_item(&self, collection: Collection, id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM portfolio_items WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
