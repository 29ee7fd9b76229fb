//! Feedback entry entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{FeedbackId, ItemId, Timestamp, UserId};
use crate::domain::user::UserProfile;

/// A free-text feedback entry. Append-only: never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub text: String,
    pub created_at: Timestamp,
}

impl FeedbackEntry {
    /// Creates an entry as reconstituted from storage.
    pub fn new(
        id: FeedbackId,
        user_id: UserId,
        item_id: ItemId,
        text: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            item_id,
            text: text.into(),
            created_at,
        }
    }
}

/// A feedback entry joined with its author's display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackWithAuthor {
    pub entry: FeedbackEntry,
    pub author: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_entry_holds_references() {
        let entry = FeedbackEntry::new(
            FeedbackId::new(1),
            UserId::new(10),
            ItemId::new(3),
            "Great battery life",
            Timestamp::now(),
        );
        assert_eq!(entry.user_id, UserId::new(10));
        assert_eq!(entry.item_id, ItemId::new(3));
        assert_eq!(entry.text, "Great battery life");
    }
}
