use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{AdminCredential, Collection, Section};
use crate::database::store::{order_of, PortfolioStore};

#[derive(Debug)]
struct StoredItem {
    id: String,
    seq: u64,
    document: Value,
}

#[derive(Debug, Default)]
struct Inner {
    admin: Option<AdminCredential>,
    sections: HashMap<Section, Value>,
    items: HashMap<Collection, Vec<StoredItem>>,
    next_seq: u64,
}

/// In-process store used for development (`DATABASE_URL=memory`) and tests.
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn admin_exists(&self) -> Result<bool, DatabaseError> {
        Ok(self.inner.read().await.admin.is_some())
    }

    async fn find_admin(&self, username: &str) -> Result<Option<AdminCredential>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.admin.as_ref().filter(|a| a.username == username).cloned())
    }

    async fn insert_admin(&self, credential: AdminCredential) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().await;
        if inner.admin.is_some() {
            return Err(DatabaseError::AlreadyExists("admin".to_string()));
        }
        inner.admin = Some(credential);
        Ok(())
    }

    async fn get_section(&self, section: Section) -> Result<Option<Value>, DatabaseError> {
        Ok(self.inner.read().await.sections.get(&section).cloned())
    }

    async fn replace_section(&self, section: Section, document: Value) -> Result<(), DatabaseError> {
        self.inner.write().await.sections.insert(section, document);
        Ok(())
    }

    async fn list_items(&self, collection: Collection, limit: usize) -> Result<Vec<Value>, DatabaseError> {
        let inner = self.inner.read().await;
        let mut items: Vec<&StoredItem> = inner
            .items
            .get(&collection)
            .map(|v| v.iter().collect())
            .unwrap_or_default();
        items.sort_by_key(|item| (order_of(&item.document), item.seq));
        Ok(items.into_iter().take(limit).map(|i| i.document.clone()).collect())
    }

    async fn insert_item(&self, collection: Collection, id: &str, document: Value) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        let items = inner.items.entry(collection).or_default();
        if items.iter().any(|i| i.id == id) {
            return Err(DatabaseError::AlreadyExists(format!("{}/{}", collection.as_str(), id)));
        }
        items.push(StoredItem {
            id: id.to_string(),
            seq,
            document,
        });
        inner.next_seq += 1;
        Ok(())
    }

    async fn replace_item(&self, collection: Collection, id: &str, document: Value) -> Result<bool, DatabaseError> {
        let mut inner = self.inner.write().await;
        let existing = inner
            .items
            .get_mut(&collection)
            .and_then(|items| items.iter_mut().find(|i| i.id == id));
        match existing {
            Some(item) => {
                item.document = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_item(&self, collection: Collection, id: &str) -> Result<bool, DatabaseError> {
        let mut inner = self.inner.write().await;
        let Some(items) = inner.items.get_mut(&collection) else {
            return Ok(false);
        };
        let before = items.len();
        items.retain(|i| i.id != id);
        Ok(items.len() != before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn second_admin_is_rejected() {
        let store = MemoryStore::new();
        store.insert_admin(AdminCredential::new("admin", "h1")).await.unwrap();
        let err = store.insert_admin(AdminCredential::new("other", "h2")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::AlreadyExists(_)));
        assert!(store.find_admin("other").await.unwrap().is_none());
        assert_eq!(store.find_admin("admin").await.unwrap().unwrap().password_hash, "h1");
    }

    #[tokio::test]
    async fn items_sorted_by_order_then_insertion() {
        let store = MemoryStore::new();
        store.insert_item(Collection::Projects, "a", json!({"id": "a", "order": 2})).await.unwrap();
        store.insert_item(Collection::Projects, "b", json!({"id": "b", "order": 1})).await.unwrap();
        store.insert_item(Collection::Projects, "c", json!({"id": "c", "order": 1})).await.unwrap();
        store.insert_item(Collection::Projects, "d", json!({"id": "d"})).await.unwrap();

        let ids: Vec<String> = store
            .list_items(Collection::Projects, 100)
            .await
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["d", "b", "c", "a"]);

        let limited = store.list_items(Collection::Projects, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert!(store.list_items(Collection::Skills, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_and_delete_missing_ids_are_noops() {
        let store = MemoryStore::new();
        assert!(!store.replace_item(Collection::Skills, "nope", json!({})).await.unwrap());
        assert!(!store.delete_item(Collection::Skills, "nope").await.unwrap());

        store.insert_item(Collection::Skills, "s1", json!({"id": "s1", "name": "Rust"})).await.unwrap();
        assert!(store.replace_item(Collection::Skills, "s1", json!({"id": "s1", "name": "Go"})).await.unwrap());
        assert_eq!(store.list_items(Collection::Skills, 10).await.unwrap()[0]["name"], "Go");
        assert!(store.delete_item(Collection::Skills, "s1").await.unwrap());
        assert!(!store.delete_item(Collection::Skills, "s1").await.unwrap());
    }

    #[tokio::test]
    async fn section_replace_overwrites() {
        let store = MemoryStore::new();
        assert!(store.get_section(Section::Hero).await.unwrap().is_none());
        store.replace_section(Section::Hero, json!({"name": "one"})).await.unwrap();
        store.replace_section(Section::Hero, json!({"name": "two"})).await.unwrap();
        assert_eq!(store.get_section(Section::Hero).await.unwrap().unwrap()["name"], "two");
        assert!(store.get_section(Section::About).await.unwrap().is_none());
    }
}
