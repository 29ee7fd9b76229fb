//! Category classification for catalog items.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Fixed classification tag grouping items for browsing.
///
/// The set is extensible: adding a variant (plus its slug and label)
/// is enough for it to appear in menus and be accepted in tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Smartphones,
    Laptops,
    Headphones,
    Smartwatches,
    Tablets,
    Accessories,
    Delivery,
    CustomerService,
    Other,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 9] = [
        Category::Smartphones,
        Category::Laptops,
        Category::Headphones,
        Category::Smartwatches,
        Category::Tablets,
        Category::Accessories,
        Category::Delivery,
        Category::CustomerService,
        Category::Other,
    ];

    /// Returns the stable slug used in callback tokens and storage.
    pub fn as_slug(&self) -> &'static str {
        match self {
            Category::Smartphones => "smartphones",
            Category::Laptops => "laptops",
            Category::Headphones => "headphones",
            Category::Smartwatches => "smartwatches",
            Category::Tablets => "tablets",
            Category::Accessories => "accessories",
            Category::Delivery => "delivery",
            Category::CustomerService => "customer-service",
            Category::Other => "other",
        }
    }

    /// Returns the human-readable label for menus and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Smartphones => "Smartphones",
            Category::Laptops => "Laptops",
            Category::Headphones => "Headphones",
            Category::Smartwatches => "Smartwatches",
            Category::Tablets => "Tablets",
            Category::Accessories => "Accessories",
            Category::Delivery => "Delivery",
            Category::CustomerService => "Customer service",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_slug() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("category", format!("unknown slug '{}'", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_slug_round_trips_through_from_str() {
        for category in Category::ALL {
            let parsed: Category = category.as_slug().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn category_rejects_unknown_slug() {
        let result: Result<Category, _> = "empty-cat".parse();
        assert!(result.is_err());
    }

    #[test]
    fn category_serializes_as_kebab_case_slug() {
        let json = serde_json::to_string(&Category::CustomerService).unwrap();
        assert_eq!(json, "\"customer-service\"");
    }

    #[test]
    fn category_display_uses_label() {
        assert_eq!(Category::CustomerService.to_string(), "Customer service");
        assert_eq!(Category::Smartphones.to_string(), "Smartphones");
    }

    #[test]
    fn category_slugs_are_unique() {
        for (i, a) in Category::ALL.iter().enumerate() {
            for b in &Category::ALL[i + 1..] {
                assert_ne!(a.as_slug(), b.as_slug());
            }
        }
    }
}
