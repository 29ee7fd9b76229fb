//! Review store port.
//!
//! Defines the contract for persisting feedback entries (append-only)
//! and ratings (one row per user×item, last-write-wins), plus the
//! aggregate queries the dialog and the reporting client read.
//!
//! # Design
//!
//! - The rating uniqueness invariant is enforced by the storage engine
//!   (atomic insert-or-replace), never by application read-then-write.
//! - `snapshot` need not be one transaction, but each component of the
//!   result must be internally consistent at the time of its own query.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, FeedbackId, ItemId, RatingId, Score, UserId};
use crate::domain::review::{FeedbackWithAuthor, StoreSnapshot};

/// Repository port for feedback entries and ratings.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Appends a feedback entry. Always succeeds for resolvable ids.
    async fn add_feedback(
        &self,
        user_id: UserId,
        item_id: ItemId,
        text: &str,
    ) -> Result<FeedbackId, DomainError>;

    /// Lists feedback for an item joined with author display fields,
    /// newest first, capped at `limit`.
    async fn list_feedback_for_item(
        &self,
        item_id: ItemId,
        limit: u32,
    ) -> Result<Vec<FeedbackWithAuthor>, DomainError>;

    /// Inserts or replaces the caller's rating for an item, updating the
    /// row's timestamp. The score is validated by the caller; storage
    /// re-validates defensively.
    async fn upsert_rating(
        &self,
        user_id: UserId,
        item_id: ItemId,
        score: Score,
    ) -> Result<RatingId, DomainError>;

    /// Arithmetic mean over all rating rows for an item, rounded to one
    /// decimal place. `None` when zero ratings exist.
    async fn average_rating(&self, item_id: ItemId) -> Result<Option<f64>, DomainError>;

    /// The caller's own score for an item, if any.
    async fn user_rating(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<Score>, DomainError>;

    /// One read-only pull over the store for the reporting client.
    async fn snapshot(&self) -> Result<StoreSnapshot, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn review_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ReviewStore) {}
    }
}
