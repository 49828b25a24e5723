use std::sync::Arc;

use serde_json::Value;

use crate::database::models::{CollectionItem, SectionDocument};
use crate::database::{DatabaseError, PortfolioStore};

/// Typed access to the portfolio content sections.
#[derive(Clone)]
pub struct PortfolioService {
    store: Arc<dyn PortfolioStore>,
    list_limit: usize,
}

impl PortfolioService {
    pub fn new(store: Arc<dyn PortfolioStore>, list_limit: usize) -> Self {
        Self { store, list_limit }
    }

    /// Get the singleton document, `None` when it was never written
    pub async fn section<T: SectionDocument>(&self) -> Result<Option<T>, DatabaseError> {
        match self.store.get_section(T::SECTION).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// Replace the singleton document wholesale
    pub async fn replace_section<T: SectionDocument>(&self, document: &T) -> Result<(), DatabaseError> {
        let value = serde_json::to_value(document)?;
        self.store.replace_section(T::SECTION, value).await
    }

    /// All items of a collection, sorted by `order`
    pub async fn list<T: CollectionItem>(&self) -> Result<Vec<T>, DatabaseError> {
        self.store
            .list_items(T::COLLECTION, self.list_limit)
            .await?
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(DatabaseError::from))
            .collect()
    }

    /// Insert a new item, returning its id
    pub async fn add<T: CollectionItem>(&self, item: &T) -> Result<String, DatabaseError> {
        let id = item.id().to_string();
        self.store
            .insert_item(T::COLLECTION, &id, serde_json::to_value(item)?)
            .await?;
        Ok(id)
    }

    /// Replace the item stored under `id`. The path id overrides any id in the
    /// body. Returns `false` (and stores nothing) when `id` is unknown.
    pub async fn replace<T: CollectionItem>(&self, id: &str, mut item: T) -> Result<bool, DatabaseError> {
        item.set_id(id.to_string());
        let value: Value = serde_json::to_value(&item)?;
        self.store.replace_item(T::COLLECTION, id, value).await
    }

    /// Returns `false` when nothing was stored under `id`.
    pub async fn remove<T: CollectionItem>(&self, id: &str) -> Result<bool, DatabaseError> {
        self.store.delete_item(T::COLLECTION, id).await
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        self.store.health_check().await
    }
}
