use async_trait::async_trait;
use serde_json::Value;

use crate::database::manager::DatabaseError;
use crate::database::models::{AdminCredential, Collection, Section};

/// Document persistence for the admin credential and the portfolio content.
///
/// Documents are plain JSON objects; typing happens one layer up in
/// `PortfolioService`. Implementations must be safe to share across
/// concurrent requests.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn admin_exists(&self) -> Result<bool, DatabaseError>;

    async fn find_admin(&self, username: &str) -> Result<Option<AdminCredential>, DatabaseError>;

    /// Insert the admin record. Fails with `AlreadyExists` if any admin is
    /// already stored, even when racing another insert.
    async fn insert_admin(&self, credential: AdminCredential) -> Result<(), DatabaseError>;

    async fn get_section(&self, section: Section) -> Result<Option<Value>, DatabaseError>;

    /// Upsert the single document for `section`.
    async fn replace_section(&self, section: Section, document: Value) -> Result<(), DatabaseError>;

    /// Documents sorted by their `order` field, then by insertion.
    async fn list_items(&self, collection: Collection, limit: usize) -> Result<Vec<Value>, DatabaseError>;

    async fn insert_item(&self, collection: Collection, id: &str, document: Value) -> Result<(), DatabaseError>;

    /// Returns `false` when no document has that id.
    async fn replace_item(&self, collection: Collection, id: &str, document: Value) -> Result<bool, DatabaseError>;

    /// Returns `false` when no document has that id.
    async fn delete_item(&self, collection: Collection, id: &str) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Release backing resources on shutdown.
    async fn close(&self) {}
}

/// Sort key shared by the store implementations.
pub(crate) fn order_of(document: &Value) -> i64 {
    document.get("order").and_then(Value::as_i64).unwrap_or(0)
}
