//! Schema initialization and catalog seeding.
//!
//! Creates the four relations if absent and seeds the demo catalog with
//! `INSERT OR IGNORE` semantics, so repeated startups are no-ops.

use sqlx::SqlitePool;

use crate::domain::catalog::Category;
use crate::domain::foundation::{DomainError, Timestamp};

/// Items seeded on first startup.
const SEED_ITEMS: [(&str, Category); 9] = [
    ("iPhone 15", Category::Smartphones),
    ("Samsung Galaxy S23", Category::Smartphones),
    ("MacBook Pro", Category::Laptops),
    ("Dell XPS 13", Category::Laptops),
    ("AirPods Pro", Category::Headphones),
    ("Apple Watch Series 9", Category::Smartwatches),
    ("iPad Pro", Category::Tablets),
    ("Courier delivery", Category::Delivery),
    ("Technical support", Category::CustomerService),
];

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY,
    username TEXT,
    first_name TEXT,
    last_name TEXT,
    registered_at TEXT NOT NULL
)
"#;

const CREATE_ITEMS: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

const CREATE_FEEDBACK: &str = r#"
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    item_id INTEGER NOT NULL REFERENCES items(id),
    text TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

const CREATE_RATINGS: &str = r#"
CREATE TABLE IF NOT EXISTS ratings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    item_id INTEGER NOT NULL REFERENCES items(id),
    score INTEGER NOT NULL CHECK (score BETWEEN 1 AND 5),
    updated_at TEXT NOT NULL,
    UNIQUE (user_id, item_id)
)
"#;

/// Creates all tables if they do not exist and seeds the catalog.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DomainError> {
    for statement in [CREATE_USERS, CREATE_ITEMS, CREATE_FEEDBACK, CREATE_RATINGS] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to create table: {}", e)))?;
    }

    let now = Timestamp::now();
    for (name, category) in SEED_ITEMS {
        sqlx::query(
            "INSERT OR IGNORE INTO items (name, category, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(name)
        .bind(category.as_slug())
        .bind(now.as_datetime())
        .execute(pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to seed item '{}': {}", name, e)))?;
    }

    tracing::info!(seed_items = SEED_ITEMS.len(), "database schema ready");
    Ok(())
}
