//! Catalog store port.
//!
//! Defines the contract for reading and seeding the item catalog.
//! Read-mostly; the only write is an idempotent upsert-by-name.

use async_trait::async_trait;

use crate::domain::catalog::{Category, Item};
use crate::domain::foundation::{DomainError, ItemId};

/// Repository port for catalog items.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Inserts an item if absent, otherwise leaves the existing row
    /// untouched (the category is not updated). Returns the stable id
    /// either way; never fails on a duplicate name.
    async fn upsert_item(&self, name: &str, category: Category) -> Result<ItemId, DomainError>;

    /// Lists all items, ordered by category then name.
    async fn list_items(&self) -> Result<Vec<Item>, DomainError>;

    /// Lists the items of one category, ordered by name.
    ///
    /// Returns an empty vec (not an error) when nothing matches.
    async fn list_items_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<Item>, DomainError>;

    /// Finds an item by id. Returns `None` if not found.
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, DomainError>;
}
