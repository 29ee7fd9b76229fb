//! SQLite implementation of CatalogStore.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::domain::catalog::{Category, Item};
use crate::domain::foundation::{DomainError, ItemId, Timestamp};
use crate::ports::CatalogStore;

/// SQLite implementation of CatalogStore.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    /// Creates a store over the shared pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn upsert_item(&self, name: &str, category: Category) -> Result<ItemId, DomainError> {
        // The no-op update makes the conflicting insert return the existing
        // row id without touching its category; one atomic statement either
        // way.
        let row = sqlx::query(
            r#"
            INSERT INTO items (name, category, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET name = excluded.name
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(category.as_slug())
        .bind(Timestamp::now().as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert item: {}", e)))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;
        Ok(ItemId::new(id))
    }

    async fn list_items(&self) -> Result<Vec<Item>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, name, category, created_at FROM items ORDER BY category, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list items: {}", e)))?;

        rows.into_iter().map(row_to_item).collect()
    }

    async fn list_items_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<Item>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, category, created_at
            FROM items
            WHERE category = ?1
            ORDER BY name
            "#,
        )
        .bind(category.as_slug())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list items by category: {}", e)))?;

        rows.into_iter().map(row_to_item).collect()
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, DomainError> {
        let row = sqlx::query("SELECT id, name, category, created_at FROM items WHERE id = ?1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch item: {}", e)))?;

        row.map(row_to_item).transpose()
    }
}

pub(super) fn row_to_item(row: sqlx::sqlite::SqliteRow) -> Result<Item, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| DomainError::database(format!("Failed to get name: {}", e)))?;
    let category_slug: String = row
        .try_get("category")
        .map_err(|e| DomainError::database(format!("Failed to get category: {}", e)))?;
    let category: Category = category_slug
        .parse()
        .map_err(|e| DomainError::database(format!("Invalid category in storage: {}", e)))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::database(format!("Failed to get created_at: {}", e)))?;

    Ok(Item::new(
        ItemId::new(id),
        name,
        category,
        Timestamp::from_datetime(created_at),
    ))
}
