//! User registry port.
//!
//! Keeps the display-name lookup table keyed by the platform user id.
//! Users are upserted on contact and never deleted.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserProfile;

/// Repository port for platform user profiles.
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Inserts the profile or refreshes its name fields.
    ///
    /// The registration timestamp of an existing row is preserved.
    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), DomainError>;

    /// Finds a profile by user id. Returns `None` if never seen.
    async fn get_user(&self, user_id: UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Total number of users ever seen (for the reporting snapshot).
    async fn count_users(&self) -> Result<u64, DomainError>;
}
