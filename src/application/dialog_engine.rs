//! DialogEngine - the conversation state machine's transition table.
//!
//! Applies one dialog event to one user's state, performing the store
//! writes the transition calls for and returning the follow-up prompt.
//! Recoverable conditions (unknown item, empty category, out-of-range
//! score, stale accumulator) are answered in-band with a notice prompt;
//! only infrastructure failures surface as errors.

use std::sync::Arc;

use crate::domain::catalog::Item;
use crate::domain::dialog::{menus, DialogEvent, DialogState, DialogStep, Prompt, Purpose};
use crate::domain::foundation::{DomainError, Score};
use crate::domain::review::FeedbackWithAuthor;
use crate::domain::user::UserProfile;
use crate::ports::{CatalogStore, ReviewStore};

/// Upper bound on rendered prompt text; longer feedback listings are cut.
const MAX_PROMPT_LEN: usize = 4000;

/// The conversation state machine, bound to its stores.
pub struct DialogEngine {
    catalog: Arc<dyn CatalogStore>,
    reviews: Arc<dyn ReviewStore>,
    feedback_page_size: u32,
}

impl DialogEngine {
    /// Creates an engine over the given stores.
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        reviews: Arc<dyn ReviewStore>,
        feedback_page_size: u32,
    ) -> Self {
        Self {
            catalog,
            reviews,
            feedback_page_size,
        }
    }

    /// Applies one event to one user's dialog state.
    ///
    /// The caller must hold that user's exclusive session lock, so two
    /// events for the same user are never interleaved here.
    pub async fn apply(
        &self,
        user: &UserProfile,
        state: &mut DialogState,
        event: DialogEvent,
    ) -> Result<Prompt, DomainError> {
        match event {
            DialogEvent::Start(purpose) => {
                state.begin(purpose);
                Ok(Prompt::with_menu(
                    category_prompt_text(purpose),
                    menus::categories_menu(),
                ))
            }

            DialogEvent::CategoryChosen(category) => {
                let Some(purpose) = state.purpose() else {
                    // Stale button from a dialog that no longer exists.
                    state.reset();
                    return Ok(Prompt::with_menu(stale_context_text(), menus::main_menu()));
                };

                let items = self.catalog.list_items_by_category(category).await?;
                if items.is_empty() {
                    // No transition; the user picks another category.
                    return Ok(Prompt::text(format!(
                        "There are no items in '{}' yet. Pick another category.",
                        category.label()
                    )));
                }

                state.select_category(category);
                Ok(Prompt::with_menu(
                    format!("Pick an item from '{}':", category.label()),
                    menus::items_menu(&items, purpose),
                ))
            }

            DialogEvent::ItemChosen { id, purpose } => {
                let Some(item) = self.catalog.get_item(id).await? else {
                    // Stale or malformed button payload; state unchanged so
                    // the user can retry or navigate back.
                    return Ok(Prompt::text(item_not_found_text()));
                };

                match purpose {
                    Purpose::Feedback => {
                        let prompt = Prompt::text(format!(
                            "You picked: {}\n\nPlease write your feedback in a reply message:",
                            item.name
                        ));
                        state.await_feedback_text(item);
                        Ok(prompt)
                    }
                    Purpose::Rate => {
                        let average = self.reviews.average_rating(item.id).await?;
                        let prior = self.reviews.user_rating(user.user_id, item.id).await?;
                        let prompt = Prompt::with_menu(
                            rate_invite_text(&item, average, prior),
                            menus::score_menu(item.id),
                        );
                        state.await_score(item);
                        Ok(prompt)
                    }
                    Purpose::View => {
                        let feedback = self
                            .reviews
                            .list_feedback_for_item(item.id, self.feedback_page_size)
                            .await?;
                        let average = self.reviews.average_rating(item.id).await?;
                        state.reset();
                        Ok(Prompt::with_menu(
                            render_feedback_list(&item, average, &feedback),
                            menus::back_menu(),
                        ))
                    }
                }
            }

            DialogEvent::TextReceived(body) => {
                if state.step() != DialogStep::AwaitingFeedbackText {
                    // Not part of a dialog; never misapplied as feedback.
                    return Ok(Prompt::with_menu(
                        "I didn't catch that. Use /leave_feedback, /view_feedback, or /rate to get started.",
                        menus::main_menu(),
                    ));
                }

                let Some(item) = state.item().cloned() else {
                    state.reset();
                    return Ok(Prompt::with_menu(stale_context_text(), menus::main_menu()));
                };

                if body.trim().is_empty() {
                    return Ok(Prompt::text(
                        "Feedback text cannot be empty. Please write a few words:",
                    ));
                }

                self.reviews
                    .add_feedback(user.user_id, item.id, &body)
                    .await?;
                state.reset();
                Ok(Prompt::with_menu(
                    format!(
                        "✅ Thanks for your feedback on '{}'!\n\nWould you also like to rate it?",
                        item.name
                    ),
                    menus::score_menu(item.id),
                ))
            }

            DialogEvent::ScoreChosen { item_id, value } => {
                let score = match Score::try_from_i64(value) {
                    Ok(score) => score,
                    Err(_) => {
                        // The fixed keyboard prevents this by construction;
                        // answer a retry prompt for hand-crafted payloads.
                        return Ok(Prompt::text(
                            "Scores run from 1 to 5. Pick one of the buttons.",
                        ));
                    }
                };

                let Some(item) = self.catalog.get_item(item_id).await? else {
                    return Ok(Prompt::text(item_not_found_text()));
                };

                self.reviews
                    .upsert_rating(user.user_id, item.id, score)
                    .await?;
                let average = self.reviews.average_rating(item.id).await?;
                state.reset();

                let mut text = format!(
                    "✅ Thanks for scoring '{}'!\n\nYour score: {} {}\n",
                    item.name,
                    score,
                    score.stars()
                );
                if let Some(average) = average {
                    text.push_str(&format!("Average rating: {} ⭐", average));
                }
                Ok(Prompt::with_menu(text, menus::back_menu()))
            }

            DialogEvent::Cancel => {
                state.reset();
                Ok(Prompt::with_menu("Action cancelled.", menus::main_menu()))
            }

            DialogEvent::BackToCategories => {
                // A back button tapped after the dialog ended has no purpose
                // to preserve; fall back to the feedback flow.
                let purpose = state.purpose().unwrap_or(Purpose::Feedback);
                state.back_to_categories(purpose);
                Ok(Prompt::with_menu(
                    category_prompt_text(purpose),
                    menus::categories_menu(),
                ))
            }
        }
    }
}

fn category_prompt_text(purpose: Purpose) -> &'static str {
    match purpose {
        Purpose::Feedback => "📋 Pick a category of product or service:",
        Purpose::View => "📋 Pick a category of product or service to browse feedback:",
        Purpose::Rate => "📋 Pick a category of product or service to rate:",
    }
}

fn item_not_found_text() -> &'static str {
    "Item not found. It may have been removed; pick another one."
}

fn stale_context_text() -> &'static str {
    "Something went wrong with this dialog. Please start over with /leave_feedback, /view_feedback, or /rate."
}

fn rate_invite_text(item: &Item, average: Option<f64>, prior: Option<Score>) -> String {
    let mut text = format!("Rating: {}\n\n", item.name);
    if let Some(average) = average {
        text.push_str(&format!("Average rating: {} ⭐\n", average));
    }
    if let Some(prior) = prior {
        text.push_str(&format!("Your current score: {} ⭐\n", prior));
    }
    text.push_str("\nPick a score from 1 to 5:");
    text
}

fn render_feedback_list(
    item: &Item,
    average: Option<f64>,
    feedback: &[FeedbackWithAuthor],
) -> String {
    let mut text = format!("📝 Feedback for: {}\n\n", item.name);

    match average {
        Some(average) => text.push_str(&format!("⭐ Average rating: {}\n\n", average)),
        None => text.push_str("⭐ No rating yet\n\n"),
    }

    if feedback.is_empty() {
        text.push_str("No feedback yet for this item.");
    } else {
        for (i, entry) in feedback.iter().enumerate() {
            text.push_str(&format!(
                "{}. From: {}\n   {}\n   Date: {}\n\n",
                i + 1,
                entry.author.display_name(),
                entry.entry.text,
                entry.entry.created_at.as_datetime().format("%Y-%m-%d %H:%M"),
            ));
        }
    }

    if text.chars().count() > MAX_PROMPT_LEN {
        let truncated: String = text.chars().take(MAX_PROMPT_LEN - 50).collect();
        text = format!("{}...\n\n(Not all feedback is shown)", truncated);
    }

    text
}
