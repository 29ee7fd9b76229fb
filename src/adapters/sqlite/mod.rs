//! SQLite adapters - persistent store implementations over one pooled
//! connection held for the process lifetime.

mod catalog_store;
mod review_store;
mod schema;
mod user_registry;

pub use catalog_store::SqliteCatalogStore;
pub use review_store::SqliteReviewStore;
pub use schema::init_schema;
pub use user_registry::SqliteUserRegistry;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Opens the pooled connection described by the database config.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DomainError::database(format!("Invalid database url: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_with(options)
        .await
        .map_err(|e| DomainError::database(format!("Failed to open database: {}", e)))
}
