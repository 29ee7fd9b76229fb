//! ReportBuilder - aggregated statistics for the admin stats command.
//!
//! A pure reporting client of the review store: everything is computed
//! from one `StoreSnapshot`, with the reference time passed in so the
//! last-week windows are deterministic under test.

use crate::domain::catalog::Category;
use crate::domain::foundation::Timestamp;
use crate::domain::review::{ItemAggregate, StoreSnapshot};

/// Default number of entries in the top-items section.
const TOP_ITEMS_LIMIT: usize = 5;

/// Headline counters for the report.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralStats {
    pub total_users: u64,
    pub users_with_feedback: u64,
    pub users_with_ratings: u64,
    pub total_feedback: u64,
    pub total_ratings: u64,
    pub average_all_items: Option<f64>,
    pub feedback_last_week: u64,
    pub ratings_last_week: u64,
    pub average_last_week: Option<f64>,
}

/// Per-category rollup of the item aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: Category,
    pub items_count: u64,
    pub average: Option<f64>,
    pub ratings_count: u64,
}

/// Computes report sections over a snapshot.
pub struct ReportBuilder<'a> {
    snapshot: &'a StoreSnapshot,
    now: Timestamp,
}

impl<'a> ReportBuilder<'a> {
    /// Creates a builder; `now` anchors the last-7-days windows.
    pub fn new(snapshot: &'a StoreSnapshot, now: Timestamp) -> Self {
        Self { snapshot, now }
    }

    /// Headline counters, overall and for the last seven days.
    pub fn general_stats(&self) -> GeneralStats {
        let week_ago = self.now.minus_days(7);

        let feedback_last_week = self
            .snapshot
            .feedback
            .iter()
            .filter(|f| f.entry.created_at.is_after(&week_ago))
            .count() as u64;

        let recent_scores: Vec<f64> = self
            .snapshot
            .ratings
            .iter()
            .filter(|r| r.updated_at.is_after(&week_ago))
            .map(|r| r.score.value() as f64)
            .collect();

        let all_scores: Vec<f64> = self
            .snapshot
            .ratings
            .iter()
            .map(|r| r.score.value() as f64)
            .collect();

        GeneralStats {
            total_users: self.snapshot.user_counts.total_users,
            users_with_feedback: self.snapshot.user_counts.users_with_feedback,
            users_with_ratings: self.snapshot.user_counts.users_with_ratings,
            total_feedback: self.snapshot.feedback.len() as u64,
            total_ratings: self.snapshot.ratings.len() as u64,
            average_all_items: mean(&all_scores).map(round_to_hundredth),
            feedback_last_week,
            ratings_last_week: recent_scores.len() as u64,
            average_last_week: mean(&recent_scores).map(round_to_hundredth),
        }
    }

    /// Rated items sorted by average descending, capped at `limit`.
    pub fn top_items(&self, limit: usize) -> Vec<&'a ItemAggregate> {
        let mut rated: Vec<&ItemAggregate> = self
            .snapshot
            .item_aggregates
            .iter()
            .filter(|agg| agg.average.is_some())
            .collect();
        rated.sort_by(|a, b| {
            b.average
                .partial_cmp(&a.average)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.ratings_count.cmp(&a.ratings_count))
        });
        rated.truncate(limit);
        rated
    }

    /// Per-category rollup: item count, mean of rated item averages,
    /// and total score count. Sorted by average descending, unrated
    /// categories last.
    pub fn category_stats(&self) -> Vec<CategoryStats> {
        let mut stats: Vec<CategoryStats> = Category::ALL
            .iter()
            .filter_map(|&category| {
                let aggregates: Vec<&ItemAggregate> = self
                    .snapshot
                    .item_aggregates
                    .iter()
                    .filter(|agg| agg.item.category == category)
                    .collect();
                if aggregates.is_empty() {
                    return None;
                }

                let rated: Vec<f64> =
                    aggregates.iter().filter_map(|agg| agg.average).collect();
                Some(CategoryStats {
                    category,
                    items_count: aggregates.len() as u64,
                    average: mean(&rated).map(round_to_hundredth),
                    ratings_count: aggregates.iter().map(|agg| agg.ratings_count).sum(),
                })
            })
            .collect();

        stats.sort_by(|a, b| {
            b.average
                .partial_cmp(&a.average)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        stats
    }

    /// Renders the full plain-text report for the admin prompt.
    pub fn render_text(&self) -> String {
        let stats = self.general_stats();

        let mut text = String::from("📊 Overall statistics\n\n");
        text.push_str(&format!("👥 Total users: {}\n", stats.total_users));
        text.push_str(&format!(
            "📝 Users with feedback: {}\n",
            stats.users_with_feedback
        ));
        text.push_str(&format!(
            "⭐ Users with ratings: {}\n\n",
            stats.users_with_ratings
        ));
        text.push_str(&format!("📝 Total feedback entries: {}\n", stats.total_feedback));
        text.push_str(&format!("⭐ Total ratings: {}\n", stats.total_ratings));
        match stats.average_all_items {
            Some(average) => {
                text.push_str(&format!("📊 Average rating across items: {}\n\n", average))
            }
            None => text.push_str("📊 No ratings yet\n\n"),
        }

        text.push_str("📅 Last 7 days\n");
        text.push_str(&format!("📝 New feedback: {}\n", stats.feedback_last_week));
        text.push_str(&format!("⭐ New ratings: {}\n", stats.ratings_last_week));
        if let Some(average) = stats.average_last_week {
            text.push_str(&format!("📊 Average: {}\n", average));
        }

        let top = self.top_items(TOP_ITEMS_LIMIT);
        if !top.is_empty() {
            text.push_str("\n🏆 Top items by rating\n\n");
            for (i, agg) in top.iter().enumerate() {
                text.push_str(&format!(
                    "{}. {} ({})\n   ⭐ {} (based on {} scores)\n",
                    i + 1,
                    agg.item.name,
                    agg.item.category.label(),
                    agg.average.unwrap_or_default(),
                    agg.ratings_count,
                ));
            }
        }

        let categories = self.category_stats();
        if !categories.is_empty() {
            text.push_str("\n📦 By category\n\n");
            for stat in categories {
                match stat.average {
                    Some(average) => text.push_str(&format!(
                        "{}: {} items, average {} across {} scores\n",
                        stat.category.label(),
                        stat.items_count,
                        average,
                        stat.ratings_count,
                    )),
                    None => text.push_str(&format!(
                        "{}: {} items, no scores yet\n",
                        stat.category.label(),
                        stat.items_count,
                    )),
                }
            }
        }

        text
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn round_to_hundredth(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Item;
    use crate::domain::foundation::{
        FeedbackId, ItemId, RatingId, Score, UserId,
    };
    use crate::domain::review::{
        FeedbackEntry, FeedbackWithAuthor, RatingRecord, UserCounts,
    };
    use crate::domain::user::UserProfile;

    fn item(id: i64, name: &str, category: Category) -> Item {
        Item::new(ItemId::new(id), name, category, Timestamp::now())
    }

    fn rating(id: i64, user: i64, item: i64, score: Score, at: Timestamp) -> RatingRecord {
        RatingRecord::new(
            RatingId::new(id),
            UserId::new(user),
            ItemId::new(item),
            score,
            at,
        )
    }

    fn feedback(id: i64, user: i64, item: i64, at: Timestamp) -> FeedbackWithAuthor {
        FeedbackWithAuthor {
            entry: FeedbackEntry::new(
                FeedbackId::new(id),
                UserId::new(user),
                ItemId::new(item),
                "text",
                at,
            ),
            author: UserProfile::new(UserId::new(user), None, None, None, at),
        }
    }

    fn test_snapshot(now: Timestamp) -> StoreSnapshot {
        let recent = now.minus_days(1);
        let old = now.minus_days(30);

        StoreSnapshot {
            feedback: vec![
                feedback(1, 10, 1, recent),
                feedback(2, 11, 1, old),
                feedback(3, 10, 2, old),
            ],
            ratings: vec![
                rating(1, 10, 1, Score::Five, recent),
                rating(2, 11, 1, Score::Four, old),
                rating(3, 10, 2, Score::Two, old),
            ],
            item_aggregates: vec![
                ItemAggregate {
                    item: item(1, "iPhone 15", Category::Smartphones),
                    average: Some(4.5),
                    ratings_count: 2,
                },
                ItemAggregate {
                    item: item(2, "MacBook Pro", Category::Laptops),
                    average: Some(2.0),
                    ratings_count: 1,
                },
                ItemAggregate {
                    item: item(3, "iPad Pro", Category::Tablets),
                    average: None,
                    ratings_count: 0,
                },
            ],
            user_counts: UserCounts {
                total_users: 3,
                users_with_feedback: 2,
                users_with_ratings: 2,
            },
        }
    }

    #[test]
    fn general_stats_counts_totals_and_week_window() {
        let now = Timestamp::now();
        let snapshot = test_snapshot(now);
        let stats = ReportBuilder::new(&snapshot, now).general_stats();

        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_feedback, 3);
        assert_eq!(stats.total_ratings, 3);
        // (5 + 4 + 2) / 3 = 3.67 rounded to two decimals.
        assert_eq!(stats.average_all_items, Some(3.67));

        assert_eq!(stats.feedback_last_week, 1);
        assert_eq!(stats.ratings_last_week, 1);
        assert_eq!(stats.average_last_week, Some(5.0));
    }

    #[test]
    fn general_stats_on_empty_snapshot_has_no_averages() {
        let now = Timestamp::now();
        let snapshot = StoreSnapshot::empty();
        let stats = ReportBuilder::new(&snapshot, now).general_stats();

        assert_eq!(stats.total_ratings, 0);
        assert_eq!(stats.average_all_items, None);
        assert_eq!(stats.average_last_week, None);
    }

    #[test]
    fn top_items_sorts_by_average_and_skips_unrated() {
        let now = Timestamp::now();
        let snapshot = test_snapshot(now);
        let top = ReportBuilder::new(&snapshot, now).top_items(5);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].item.name, "iPhone 15");
        assert_eq!(top[1].item.name, "MacBook Pro");
    }

    #[test]
    fn top_items_respects_limit() {
        let now = Timestamp::now();
        let snapshot = test_snapshot(now);
        let top = ReportBuilder::new(&snapshot, now).top_items(1);

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].item.name, "iPhone 15");
    }

    #[test]
    fn category_stats_groups_by_category() {
        let now = Timestamp::now();
        let snapshot = test_snapshot(now);
        let stats = ReportBuilder::new(&snapshot, now).category_stats();

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].category, Category::Smartphones);
        assert_eq!(stats[0].average, Some(4.5));
        assert_eq!(stats[0].ratings_count, 2);

        let tablets = stats
            .iter()
            .find(|s| s.category == Category::Tablets)
            .unwrap();
        assert_eq!(tablets.average, None);
        assert_eq!(tablets.items_count, 1);
    }

    #[test]
    fn render_text_includes_all_sections() {
        let now = Timestamp::now();
        let snapshot = test_snapshot(now);
        let text = ReportBuilder::new(&snapshot, now).render_text();

        assert!(text.contains("Total users: 3"));
        assert!(text.contains("Last 7 days"));
        assert!(text.contains("Top items by rating"));
        assert!(text.contains("iPhone 15"));
        assert!(text.contains("By category"));
    }

    #[test]
    fn render_text_on_empty_snapshot_skips_top_section() {
        let now = Timestamp::now();
        let snapshot = StoreSnapshot::empty();
        let text = ReportBuilder::new(&snapshot, now).render_text();

        assert!(text.contains("No ratings yet"));
        assert!(!text.contains("Top items"));
    }
}
