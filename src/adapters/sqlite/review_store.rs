//! SQLite implementation of ReviewStore.
//!
//! The one-rating-per-user×item invariant is carried by the
//! UNIQUE(user_id, item_id) constraint plus a single-statement
//! insert-or-replace, so concurrent ratings from the same user (doubled
//! taps) can never produce two rows or lose an update.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::domain::foundation::{
    DomainError, FeedbackId, ItemId, RatingId, Score, Timestamp, UserId,
};
use crate::domain::review::{
    round_to_tenth, FeedbackEntry, FeedbackWithAuthor, ItemAggregate, RatingRecord,
    StoreSnapshot, UserCounts,
};
use crate::domain::user::UserProfile;
use crate::ports::ReviewStore;

/// SQLite implementation of ReviewStore.
#[derive(Clone)]
pub struct SqliteReviewStore {
    pool: SqlitePool,
}

impl SqliteReviewStore {
    /// Creates a store over the shared pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for SqliteReviewStore {
    async fn add_feedback(
        &self,
        user_id: UserId,
        item_id: ItemId,
        text: &str,
    ) -> Result<FeedbackId, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO feedback (user_id, item_id, text, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(user_id.as_i64())
        .bind(item_id.as_i64())
        .bind(text)
        .bind(Timestamp::now().as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert feedback: {}", e)))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;
        Ok(FeedbackId::new(id))
    }

    async fn list_feedback_for_item(
        &self,
        item_id: ItemId,
        limit: u32,
    ) -> Result<Vec<FeedbackWithAuthor>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.user_id, f.item_id, f.text, f.created_at,
                   u.username, u.first_name, u.last_name, u.registered_at
            FROM feedback f
            LEFT JOIN users u ON u.user_id = f.user_id
            WHERE f.item_id = ?1
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT ?2
            "#,
        )
        .bind(item_id.as_i64())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list feedback: {}", e)))?;

        rows.into_iter().map(row_to_feedback_with_author).collect()
    }

    async fn upsert_rating(
        &self,
        user_id: UserId,
        item_id: ItemId,
        score: Score,
    ) -> Result<RatingId, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO ratings (user_id, item_id, score, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, item_id) DO UPDATE SET
                score = excluded.score,
                updated_at = excluded.updated_at
            RETURNING id
            "#,
        )
        .bind(user_id.as_i64())
        .bind(item_id.as_i64())
        .bind(score.value() as i64)
        .bind(Timestamp::now().as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert rating: {}", e)))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;
        Ok(RatingId::new(id))
    }

    async fn average_rating(&self, item_id: ItemId) -> Result<Option<f64>, DomainError> {
        let row = sqlx::query("SELECT AVG(score) AS avg_score FROM ratings WHERE item_id = ?1")
            .bind(item_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to average ratings: {}", e)))?;

        let average: Option<f64> = row
            .try_get("avg_score")
            .map_err(|e| DomainError::database(format!("Failed to get avg_score: {}", e)))?;
        Ok(average.map(round_to_tenth))
    }

    async fn user_rating(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<Score>, DomainError> {
        let row = sqlx::query(
            "SELECT score FROM ratings WHERE user_id = ?1 AND item_id = ?2",
        )
        .bind(user_id.as_i64())
        .bind(item_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch user rating: {}", e)))?;

        match row {
            Some(row) => {
                let value: i64 = row
                    .try_get("score")
                    .map_err(|e| DomainError::database(format!("Failed to get score: {}", e)))?;
                let score = Score::try_from_i64(value).map_err(|e| {
                    DomainError::database(format!("Invalid score in storage: {}", e))
                })?;
                Ok(Some(score))
            }
            None => Ok(None),
        }
    }

    async fn snapshot(&self) -> Result<StoreSnapshot, DomainError> {
        let feedback_rows = sqlx::query(
            r#"
            SELECT f.id, f.user_id, f.item_id, f.text, f.created_at,
                   u.username, u.first_name, u.last_name, u.registered_at
            FROM feedback f
            LEFT JOIN users u ON u.user_id = f.user_id
            ORDER BY f.created_at DESC, f.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to snapshot feedback: {}", e)))?;

        let feedback: Result<Vec<FeedbackWithAuthor>, DomainError> =
            feedback_rows.into_iter().map(row_to_feedback_with_author).collect();
        let feedback = feedback?;

        let rating_rows = sqlx::query(
            r#"
            SELECT id, user_id, item_id, score, updated_at
            FROM ratings
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to snapshot ratings: {}", e)))?;

        let ratings: Result<Vec<RatingRecord>, DomainError> =
            rating_rows.into_iter().map(row_to_rating).collect();
        let ratings = ratings?;

        let aggregate_rows = sqlx::query(
            r#"
            SELECT i.id, i.name, i.category, i.created_at,
                   AVG(r.score) AS avg_score,
                   COUNT(r.id) AS ratings_count
            FROM items i
            LEFT JOIN ratings r ON r.item_id = i.id
            GROUP BY i.id
            ORDER BY avg_score DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to snapshot aggregates: {}", e)))?;

        let mut item_aggregates = Vec::with_capacity(aggregate_rows.len());
        for row in aggregate_rows {
            let average: Option<f64> = row
                .try_get("avg_score")
                .map_err(|e| DomainError::database(format!("Failed to get avg_score: {}", e)))?;
            let ratings_count: i64 = row.try_get("ratings_count").map_err(|e| {
                DomainError::database(format!("Failed to get ratings_count: {}", e))
            })?;
            let item = super::catalog_store::row_to_item(row)?;
            item_aggregates.push(ItemAggregate {
                item,
                average: average.map(round_to_tenth),
                ratings_count: ratings_count as u64,
            });
        }

        let counts_row = sqlx::query(
            r#"
            SELECT (SELECT COUNT(*) FROM users) AS total_users,
                   (SELECT COUNT(DISTINCT user_id) FROM feedback) AS users_with_feedback,
                   (SELECT COUNT(DISTINCT user_id) FROM ratings) AS users_with_ratings
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to snapshot user counts: {}", e)))?;

        let total_users: i64 = counts_row
            .try_get("total_users")
            .map_err(|e| DomainError::database(format!("Failed to get total_users: {}", e)))?;
        let users_with_feedback: i64 = counts_row.try_get("users_with_feedback").map_err(|e| {
            DomainError::database(format!("Failed to get users_with_feedback: {}", e))
        })?;
        let users_with_ratings: i64 = counts_row.try_get("users_with_ratings").map_err(|e| {
            DomainError::database(format!("Failed to get users_with_ratings: {}", e))
        })?;

        Ok(StoreSnapshot {
            feedback,
            ratings,
            item_aggregates,
            user_counts: UserCounts {
                total_users: total_users as u64,
                users_with_feedback: users_with_feedback as u64,
                users_with_ratings: users_with_ratings as u64,
            },
        })
    }
}

fn row_to_feedback_with_author(
    row: sqlx::sqlite::SqliteRow,
) -> Result<FeedbackWithAuthor, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;
    let user_id: i64 = row
        .try_get("user_id")
        .map_err(|e| DomainError::database(format!("Failed to get user_id: {}", e)))?;
    let item_id: i64 = row
        .try_get("item_id")
        .map_err(|e| DomainError::database(format!("Failed to get item_id: {}", e)))?;
    let text: String = row
        .try_get("text")
        .map_err(|e| DomainError::database(format!("Failed to get text: {}", e)))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::database(format!("Failed to get created_at: {}", e)))?;

    let username: Option<String> = row
        .try_get("username")
        .map_err(|e| DomainError::database(format!("Failed to get username: {}", e)))?;
    let first_name: Option<String> = row
        .try_get("first_name")
        .map_err(|e| DomainError::database(format!("Failed to get first_name: {}", e)))?;
    let last_name: Option<String> = row
        .try_get("last_name")
        .map_err(|e| DomainError::database(format!("Failed to get last_name: {}", e)))?;
    let registered_at: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("registered_at")
        .map_err(|e| DomainError::database(format!("Failed to get registered_at: {}", e)))?;

    let entry = FeedbackEntry::new(
        FeedbackId::new(id),
        UserId::new(user_id),
        ItemId::new(item_id),
        text,
        Timestamp::from_datetime(created_at),
    );
    // Left-join semantics: an author row may be missing for imported data.
    let author = UserProfile::new(
        UserId::new(user_id),
        username,
        first_name,
        last_name,
        registered_at
            .map(Timestamp::from_datetime)
            .unwrap_or(entry.created_at),
    );

    Ok(FeedbackWithAuthor { entry, author })
}

fn row_to_rating(row: sqlx::sqlite::SqliteRow) -> Result<RatingRecord, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;
    let user_id: i64 = row
        .try_get("user_id")
        .map_err(|e| DomainError::database(format!("Failed to get user_id: {}", e)))?;
    let item_id: i64 = row
        .try_get("item_id")
        .map_err(|e| DomainError::database(format!("Failed to get item_id: {}", e)))?;
    let value: i64 = row
        .try_get("score")
        .map_err(|e| DomainError::database(format!("Failed to get score: {}", e)))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| DomainError::database(format!("Failed to get updated_at: {}", e)))?;

    let score = Score::try_from_i64(value)
        .map_err(|e| DomainError::database(format!("Invalid score in storage: {}", e)))?;

    Ok(RatingRecord::new(
        RatingId::new(id),
        UserId::new(user_id),
        ItemId::new(item_id),
        score,
        Timestamp::from_datetime(updated_at),
    ))
}
