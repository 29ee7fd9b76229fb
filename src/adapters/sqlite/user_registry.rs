//! SQLite implementation of UserRegistry.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::user::UserProfile;
use crate::ports::UserRegistry;

/// SQLite implementation of UserRegistry.
#[derive(Clone)]
pub struct SqliteUserRegistry {
    pool: SqlitePool,
}

impl SqliteUserRegistry {
    /// Creates a registry over the shared pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRegistry for SqliteUserRegistry {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), DomainError> {
        // Name fields refresh on every contact; registered_at survives.
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, first_name, last_name, registered_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                last_name = excluded.last_name
            "#,
        )
        .bind(profile.user_id.as_i64())
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.registered_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert user: {}", e)))?;

        Ok(())
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<UserProfile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, username, first_name, last_name, registered_at
            FROM users
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_profile(row)?)),
            None => Ok(None),
        }
    }

    async fn count_users(&self) -> Result<u64, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to count users: {}", e)))?;

        Ok(result.0 as u64)
    }
}

fn row_to_profile(row: sqlx::sqlite::SqliteRow) -> Result<UserProfile, DomainError> {
    let user_id: i64 = row
        .try_get("user_id")
        .map_err(|e| DomainError::database(format!("Failed to get user_id: {}", e)))?;
    let username: Option<String> = row
        .try_get("username")
        .map_err(|e| DomainError::database(format!("Failed to get username: {}", e)))?;
    let first_name: Option<String> = row
        .try_get("first_name")
        .map_err(|e| DomainError::database(format!("Failed to get first_name: {}", e)))?;
    let last_name: Option<String> = row
        .try_get("last_name")
        .map_err(|e| DomainError::database(format!("Failed to get last_name: {}", e)))?;
    let registered_at: chrono::DateTime<chrono::Utc> = row
        .try_get("registered_at")
        .map_err(|e| DomainError::database(format!("Failed to get registered_at: {}", e)))?;

    Ok(UserProfile::new(
        UserId::new(user_id),
        username,
        first_name,
        last_name,
        Timestamp::from_datetime(registered_at),
    ))
}
