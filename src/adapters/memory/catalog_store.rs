//! In-memory catalog store.
//!
//! Useful for testing and development; mirrors the ordering guarantees
//! of the SQLite adapter.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::catalog::{Category, Item};
use crate::domain::foundation::{DomainError, ItemId, Timestamp};
use crate::ports::CatalogStore;

#[derive(Debug, Default)]
struct Inner {
    items: Vec<Item>,
    next_id: i64,
}

/// In-memory implementation of CatalogStore.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryCatalogStore {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items held (useful for tests).
    pub async fn item_count(&self) -> usize {
        self.inner.read().await.items.len()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn upsert_item(&self, name: &str, category: Category) -> Result<ItemId, DomainError> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.items.iter().find(|item| item.name == name) {
            return Ok(existing.id);
        }
        inner.next_id += 1;
        let id = ItemId::new(inner.next_id);
        inner
            .items
            .push(Item::new(id, name, category, Timestamp::now()));
        Ok(id)
    }

    async fn list_items(&self) -> Result<Vec<Item>, DomainError> {
        let inner = self.inner.read().await;
        let mut items = inner.items.clone();
        items.sort_by(|a, b| {
            a.category
                .as_slug()
                .cmp(b.category.as_slug())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(items)
    }

    async fn list_items_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<Item>, DomainError> {
        let inner = self.inner.read().await;
        let mut items: Vec<Item> = inner
            .items
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.items.iter().find(|item| item.id == id).cloned())
    }
}
