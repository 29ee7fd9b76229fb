//! User module - platform users and their display names.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// A platform user, created on first observed event.
///
/// Name fields are refreshed on repeat contact; the registration
/// timestamp is preserved across upserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub registered_at: Timestamp,
}

impl UserProfile {
    /// Creates a profile from the fields the platform supplies.
    pub fn new(
        user_id: UserId,
        username: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        registered_at: Timestamp,
    ) -> Self {
        Self {
            user_id,
            username,
            first_name,
            last_name,
            registered_at,
        }
    }

    /// Returns the name shown next to feedback entries.
    ///
    /// Prefers `@username`, then first/last name, then the raw id.
    pub fn display_name(&self) -> String {
        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            return format!("@{}", username);
        }
        let full = match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => String::new(),
        };
        let full = full.trim().to_string();
        if full.is_empty() {
            format!("user {}", self.user_id)
        } else {
            full
        }
    }
}
