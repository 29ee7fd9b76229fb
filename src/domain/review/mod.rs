//! Review module - feedback entries, ratings, and reporting snapshots.

mod feedback;
mod rating;
mod snapshot;

pub use feedback::{FeedbackEntry, FeedbackWithAuthor};
pub use rating::{round_to_tenth, RatingRecord};
pub use snapshot::{ItemAggregate, StoreSnapshot, UserCounts};
