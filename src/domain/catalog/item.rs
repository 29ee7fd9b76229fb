//! Catalog item entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ItemId, Timestamp};

use super::Category;

/// A product or service that can receive feedback and ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub created_at: Timestamp,
}

impl Item {
    /// Creates an item as reconstituted from storage.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        category: Category,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_holds_identity_and_category() {
        let item = Item::new(
            ItemId::new(5),
            "AirPods Pro",
            Category::Headphones,
            Timestamp::now(),
        );
        assert_eq!(item.id, ItemId::new(5));
        assert_eq!(item.name, "AirPods Pro");
        assert_eq!(item.category, Category::Headphones);
    }
}
