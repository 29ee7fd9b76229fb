//! In-memory review store.
//!
//! Holds feedback and rating rows behind one lock so the rating
//! uniqueness invariant is enforced atomically, matching what the
//! SQLite adapter gets from its UNIQUE constraint. Joins against the
//! catalog and user registry resolve through the same ports the SQL
//! adapter joins through tables.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    DomainError, FeedbackId, ItemId, RatingId, Score, Timestamp, UserId,
};
use crate::domain::review::{
    round_to_tenth, FeedbackEntry, FeedbackWithAuthor, ItemAggregate, RatingRecord,
    StoreSnapshot, UserCounts,
};
use crate::domain::user::UserProfile;
use crate::ports::{CatalogStore, ReviewStore, UserRegistry};

#[derive(Debug, Default)]
struct Inner {
    feedback: Vec<FeedbackEntry>,
    ratings: Vec<RatingRecord>,
    next_feedback_id: i64,
    next_rating_id: i64,
}

/// In-memory implementation of ReviewStore.
#[derive(Clone)]
pub struct InMemoryReviewStore {
    catalog: Arc<dyn CatalogStore>,
    users: Arc<dyn UserRegistry>,
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryReviewStore {
    /// Creates an empty store joined against the given catalog and registry.
    pub fn new(catalog: Arc<dyn CatalogStore>, users: Arc<dyn UserRegistry>) -> Self {
        Self {
            catalog,
            users,
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    async fn author_for(&self, user_id: UserId, fallback: Timestamp) -> UserProfile {
        match self.users.get_user(user_id).await {
            Ok(Some(profile)) => profile,
            // Left-join semantics: an unknown author still shows up,
            // under the raw id.
            _ => UserProfile::new(user_id, None, None, None, fallback),
        }
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn add_feedback(
        &self,
        user_id: UserId,
        item_id: ItemId,
        text: &str,
    ) -> Result<FeedbackId, DomainError> {
        let mut inner = self.inner.write().await;
        inner.next_feedback_id += 1;
        let id = FeedbackId::new(inner.next_feedback_id);
        inner
            .feedback
            .push(FeedbackEntry::new(id, user_id, item_id, text, Timestamp::now()));
        Ok(id)
    }

    async fn list_feedback_for_item(
        &self,
        item_id: ItemId,
        limit: u32,
    ) -> Result<Vec<FeedbackWithAuthor>, DomainError> {
        let entries: Vec<FeedbackEntry> = {
            let inner = self.inner.read().await;
            let mut entries: Vec<FeedbackEntry> = inner
                .feedback
                .iter()
                .filter(|entry| entry.item_id == item_id)
                .cloned()
                .collect();
            // Newest first; ids break ties among same-instant writes.
            entries.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then(b.id.as_i64().cmp(&a.id.as_i64()))
            });
            entries.truncate(limit as usize);
            entries
        };

        let mut joined = Vec::with_capacity(entries.len());
        for entry in entries {
            let author = self.author_for(entry.user_id, entry.created_at).await;
            joined.push(FeedbackWithAuthor { entry, author });
        }
        Ok(joined)
    }

    async fn upsert_rating(
        &self,
        user_id: UserId,
        item_id: ItemId,
        score: Score,
    ) -> Result<RatingId, DomainError> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .ratings
            .iter_mut()
            .find(|r| r.user_id == user_id && r.item_id == item_id)
        {
            existing.score = score;
            existing.updated_at = Timestamp::now();
            return Ok(existing.id);
        }
        inner.next_rating_id += 1;
        let id = RatingId::new(inner.next_rating_id);
        inner
            .ratings
            .push(RatingRecord::new(id, user_id, item_id, score, Timestamp::now()));
        Ok(id)
    }

    async fn average_rating(&self, item_id: ItemId) -> Result<Option<f64>, DomainError> {
        let inner = self.inner.read().await;
        let scores: Vec<f64> = inner
            .ratings
            .iter()
            .filter(|r| r.item_id == item_id)
            .map(|r| r.score.value() as f64)
            .collect();
        if scores.is_empty() {
            return Ok(None);
        }
        Ok(Some(round_to_tenth(
            scores.iter().sum::<f64>() / scores.len() as f64,
        )))
    }

    async fn user_rating(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<Score>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .iter()
            .find(|r| r.user_id == user_id && r.item_id == item_id)
            .map(|r| r.score))
    }

    async fn snapshot(&self) -> Result<StoreSnapshot, DomainError> {
        let (feedback_rows, ratings) = {
            let inner = self.inner.read().await;
            let mut feedback = inner.feedback.clone();
            feedback.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let mut ratings = inner.ratings.clone();
            ratings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            (feedback, ratings)
        };

        let mut feedback = Vec::with_capacity(feedback_rows.len());
        for entry in feedback_rows {
            let author = self.author_for(entry.user_id, entry.created_at).await;
            feedback.push(FeedbackWithAuthor { entry, author });
        }

        let items = self.catalog.list_items().await?;
        let mut item_aggregates: Vec<ItemAggregate> = Vec::with_capacity(items.len());
        for item in items {
            let scores: Vec<f64> = ratings
                .iter()
                .filter(|r| r.item_id == item.id)
                .map(|r| r.score.value() as f64)
                .collect();
            let average = if scores.is_empty() {
                None
            } else {
                Some(round_to_tenth(scores.iter().sum::<f64>() / scores.len() as f64))
            };
            item_aggregates.push(ItemAggregate {
                item,
                average,
                ratings_count: scores.len() as u64,
            });
        }
        item_aggregates.sort_by(|a, b| {
            b.average
                .partial_cmp(&a.average)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut with_feedback: Vec<UserId> =
            feedback.iter().map(|f| f.entry.user_id).collect();
        with_feedback.sort_by_key(|id| id.as_i64());
        with_feedback.dedup();

        let mut with_ratings: Vec<UserId> = ratings.iter().map(|r| r.user_id).collect();
        with_ratings.sort_by_key(|id| id.as_i64());
        with_ratings.dedup();

        // The registry is the source of truth for the population count.
        let total_users = self.users.count_users().await?;

        Ok(StoreSnapshot {
            feedback,
            ratings,
            item_aggregates,
            user_counts: UserCounts {
                total_users,
                users_with_feedback: with_feedback.len() as u64,
                users_with_ratings: with_ratings.len() as u64,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCatalogStore, InMemoryUserRegistry};
    use crate::domain::catalog::Category;

    async fn test_store() -> (InMemoryReviewStore, Arc<InMemoryCatalogStore>, ItemId) {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let item_id = catalog
            .upsert_item("iPhone 15", Category::Smartphones)
            .await
            .unwrap();
        let users = Arc::new(InMemoryUserRegistry::new());
        users
            .upsert_user(&UserProfile::new(
                UserId::new(10),
                Some("alice".to_string()),
                None,
                None,
                Timestamp::now(),
            ))
            .await
            .unwrap();
        let store = InMemoryReviewStore::new(catalog.clone(), users);
        (store, catalog, item_id)
    }

    #[tokio::test]
    async fn add_feedback_is_never_lossy() {
        let (store, _, item_id) = test_store().await;
        let user = UserId::new(10);

        for i in 0..3 {
            store
                .add_feedback(user, item_id, &format!("entry {}", i))
                .await
                .unwrap();
        }

        let listed = store.list_feedback_for_item(item_id, 10).await.unwrap();
        assert_eq!(listed.len(), 3);
        // Newest first.
        assert_eq!(listed[0].entry.text, "entry 2");
        assert_eq!(listed[0].author.display_name(), "@alice");
    }

    #[tokio::test]
    async fn list_feedback_respects_limit() {
        let (store, _, item_id) = test_store().await;
        for i in 0..5 {
            store
                .add_feedback(UserId::new(10), item_id, &format!("entry {}", i))
                .await
                .unwrap();
        }

        let listed = store.list_feedback_for_item(item_id, 2).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn repeat_rating_replaces_in_place() {
        let (store, _, item_id) = test_store().await;
        let user = UserId::new(10);

        let first = store.upsert_rating(user, item_id, Score::Two).await.unwrap();
        let second = store.upsert_rating(user, item_id, Score::Five).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.user_rating(user, item_id).await.unwrap(), Some(Score::Five));

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.ratings.len(), 1);
        assert_eq!(snapshot.ratings[0].score, Score::Five);
    }

    #[tokio::test]
    async fn average_rating_rounds_to_one_decimal() {
        let (store, _, item_id) = test_store().await;
        store
            .upsert_rating(UserId::new(1), item_id, Score::Four)
            .await
            .unwrap();
        store
            .upsert_rating(UserId::new(2), item_id, Score::Five)
            .await
            .unwrap();
        store
            .upsert_rating(UserId::new(3), item_id, Score::Five)
            .await
            .unwrap();

        // (4 + 5 + 5) / 3 = 4.666... -> 4.7
        assert_eq!(store.average_rating(item_id).await.unwrap(), Some(4.7));
    }

    #[tokio::test]
    async fn average_rating_is_none_without_rows() {
        let (store, _, item_id) = test_store().await;
        assert_eq!(store.average_rating(item_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn snapshot_aggregates_match_rating_rows() {
        let (store, catalog, item_id) = test_store().await;
        let unrated = catalog
            .upsert_item("iPad Pro", Category::Tablets)
            .await
            .unwrap();

        store
            .upsert_rating(UserId::new(10), item_id, Score::Four)
            .await
            .unwrap();
        store
            .add_feedback(UserId::new(10), item_id, "nice")
            .await
            .unwrap();

        let snapshot = store.snapshot().await.unwrap();

        assert_eq!(snapshot.item_aggregates.len(), 2);
        let rated = snapshot
            .item_aggregates
            .iter()
            .find(|agg| agg.item.id == item_id)
            .unwrap();
        assert_eq!(rated.average, Some(4.0));
        assert_eq!(rated.ratings_count, 1);

        let empty = snapshot
            .item_aggregates
            .iter()
            .find(|agg| agg.item.id == unrated)
            .unwrap();
        assert_eq!(empty.average, None);
        assert_eq!(empty.ratings_count, 0);

        assert_eq!(snapshot.user_counts.total_users, 1);
        assert_eq!(snapshot.user_counts.users_with_feedback, 1);
        assert_eq!(snapshot.user_counts.users_with_ratings, 1);
    }

    #[tokio::test]
    async fn unknown_author_falls_back_to_raw_id() {
        let (store, _, item_id) = test_store().await;
        store
            .add_feedback(UserId::new(777), item_id, "drive-by feedback")
            .await
            .unwrap();

        let listed = store.list_feedback_for_item(item_id, 10).await.unwrap();
        assert_eq!(listed[0].author.display_name(), "user 777");
    }
}
