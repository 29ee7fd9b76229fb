//! Rating row entity and average helpers.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ItemId, RatingId, Score, Timestamp, UserId};

/// A user's score for an item. At most one row exists per (user, item);
/// a repeat rating replaces the score and timestamp in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub id: RatingId,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub score: Score,
    pub updated_at: Timestamp,
}

impl RatingRecord {
    /// Creates a record as reconstituted from storage.
    pub fn new(
        id: RatingId,
        user_id: UserId,
        item_id: ItemId,
        score: Score,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            item_id,
            score,
            updated_at,
        }
    }
}

/// Rounds an average score to one decimal place, the precision shown to users.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
