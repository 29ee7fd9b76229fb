//! Read-only snapshot types consumed by the reporting client.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Item;

use super::{FeedbackWithAuthor, RatingRecord};

/// Per-item rating aggregate. Items with zero ratings appear with
/// `average: None`, distinguishing "no opinion" from a low score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAggregate {
    pub item: Item,
    pub average: Option<f64>,
    pub ratings_count: u64,
}

/// User participation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounts {
    pub total_users: u64,
    pub users_with_feedback: u64,
    pub users_with_ratings: u64,
}

/// One consistent-enough read-only pull over the review store.
///
/// Not necessarily a single transaction, but each component is
/// internally consistent at the time of its own query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub feedback: Vec<FeedbackWithAuthor>,
    pub ratings: Vec<RatingRecord>,
    pub item_aggregates: Vec<ItemAggregate>,
    pub user_counts: UserCounts,
}

impl StoreSnapshot {
    /// An empty snapshot, the baseline for a fresh deployment.
    pub fn empty() -> Self {
        Self {
            feedback: Vec::new(),
            ratings: Vec::new(),
            item_aggregates: Vec::new(),
            user_counts: UserCounts {
                total_users: 0,
                users_with_feedback: 0,
                users_with_ratings: 0,
            },
        }
    }
}
