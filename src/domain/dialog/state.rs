//! Per-user dialog state.
//!
//! One live state exists per user, owned exclusively by the dispatcher's
//! map. It is not persisted: in-flight dialogs are lost on restart by
//! design.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Category, Item};

use super::Purpose;

/// The step a dialog is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogStep {
    Idle,
    AwaitingCategory,
    AwaitingItem,
    AwaitingFeedbackText,
    AwaitingScore,
}

/// Dialog progress plus the accumulator carried across steps.
///
/// A new step-initiating event supersedes, rather than queues behind,
/// whatever dialog was in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogState {
    pub(crate) step: DialogStep,
    pub(crate) purpose: Option<Purpose>,
    pub(crate) category: Option<Category>,
    pub(crate) item: Option<Item>,
}

impl DialogState {
    /// Creates an idle state with an empty accumulator.
    pub fn new() -> Self {
        Self {
            step: DialogStep::Idle,
            purpose: None,
            category: None,
            item: None,
        }
    }

    /// Returns the current step.
    pub fn step(&self) -> DialogStep {
        self.step
    }

    /// Returns the purpose the dialog was started with, if any.
    pub fn purpose(&self) -> Option<Purpose> {
        self.purpose
    }

    /// Returns the category chosen so far, if any.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Returns the item chosen so far, if any.
    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    /// Returns true when no dialog is open.
    pub fn is_idle(&self) -> bool {
        self.step == DialogStep::Idle
    }

    /// Starts a new dialog, discarding any in-flight accumulator.
    pub fn begin(&mut self, purpose: Purpose) {
        *self = Self::new();
        self.step = DialogStep::AwaitingCategory;
        self.purpose = Some(purpose);
    }

    /// Records the chosen category and moves on to item selection.
    pub fn select_category(&mut self, category: Category) {
        self.category = Some(category);
        self.item = None;
        self.step = DialogStep::AwaitingItem;
    }

    /// Records the chosen item and waits for free-text feedback.
    pub fn await_feedback_text(&mut self, item: Item) {
        self.purpose = Some(Purpose::Feedback);
        self.item = Some(item);
        self.step = DialogStep::AwaitingFeedbackText;
    }

    /// Records the chosen item and waits for a score button.
    pub fn await_score(&mut self, item: Item) {
        self.purpose = Some(Purpose::Rate);
        self.item = Some(item);
        self.step = DialogStep::AwaitingScore;
    }

    /// Returns to the category list, keeping the given purpose.
    pub fn back_to_categories(&mut self, purpose: Purpose) {
        self.purpose = Some(purpose);
        self.category = None;
        self.item = None;
        self.step = DialogStep::AwaitingCategory;
    }

    /// Discards the accumulator and returns to idle.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for DialogState {
    fn default() -> Self {
        Self::new()
    }
}
