//! In-memory user registry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserProfile;
use crate::ports::UserRegistry;

/// In-memory implementation of UserRegistry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRegistry {
    users: Arc<RwLock<HashMap<UserId, UserProfile>>>,
}

impl InMemoryUserRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users (useful for tests).
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRegistry for InMemoryUserRegistry {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let mut stored = profile.clone();
        if let Some(existing) = users.get(&profile.user_id) {
            // Name fields refresh; the registration time does not.
            stored.registered_at = existing.registered_at;
        }
        users.insert(profile.user_id, stored);
        Ok(())
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn count_users(&self) -> Result<u64, DomainError> {
        Ok(self.users.read().await.len() as u64)
    }
}
