//! Dispatcher - routes inbound events to per-user dialog state.
//!
//! Owns the map from user identity to live conversation state. Events
//! for the same user are applied strictly in arrival order behind that
//! user's session lock; different users proceed fully in parallel. The
//! map is in-memory only: in-flight dialogs are lost on restart by
//! design.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::dialog::{
    menus, CallbackToken, Command, DialogEvent, DialogState, InboundEnvelope, InboundEvent,
    Prompt, Purpose,
};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::user::UserProfile;
use crate::ports::{ReviewStore, UserRegistry};

use super::dialog_engine::DialogEngine;
use super::report::ReportBuilder;

/// Routes inbound events and owns all live dialog state.
pub struct Dispatcher {
    engine: DialogEngine,
    users: Arc<dyn UserRegistry>,
    reviews: Arc<dyn ReviewStore>,
    admin_ids: HashSet<UserId>,
    sessions: RwLock<HashMap<UserId, Arc<Mutex<DialogState>>>>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given engine, stores, and admin list.
    pub fn new(
        engine: DialogEngine,
        users: Arc<dyn UserRegistry>,
        reviews: Arc<dyn ReviewStore>,
        admin_ids: impl IntoIterator<Item = UserId>,
    ) -> Self {
        Self {
            engine,
            users,
            reviews,
            admin_ids: admin_ids.into_iter().collect(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Applies one inbound event and returns the outbound prompt.
    ///
    /// The sender's profile is upserted on every contact so display
    /// names stay fresh and feedback joins always resolve.
    pub async fn dispatch(&self, envelope: InboundEnvelope) -> Result<Prompt, DomainError> {
        let user = &envelope.user;
        self.users.upsert_user(user).await?;

        tracing::debug!(
            event_id = %envelope.event_id,
            user_id = %user.user_id,
            "dispatching inbound event"
        );

        match &envelope.event {
            InboundEvent::Command(command) => match command {
                Command::Start => Ok(welcome_prompt()),
                Command::LeaveFeedback => {
                    self.drive(user, DialogEvent::Start(Purpose::Feedback)).await
                }
                Command::ViewFeedback => {
                    self.drive(user, DialogEvent::Start(Purpose::View)).await
                }
                Command::Rate => self.drive(user, DialogEvent::Start(Purpose::Rate)).await,
                Command::Stats => Ok(self.stats(user).await),
            },
            InboundEvent::Callback(token) => {
                let event = match *token {
                    CallbackToken::Category(category) => DialogEvent::CategoryChosen(category),
                    CallbackToken::Item { id, purpose } => {
                        DialogEvent::ItemChosen { id, purpose }
                    }
                    CallbackToken::Score { item_id, value } => {
                        DialogEvent::ScoreChosen { item_id, value }
                    }
                    CallbackToken::Back => DialogEvent::BackToCategories,
                    CallbackToken::Cancel => DialogEvent::Cancel,
                };
                self.drive(user, event).await
            }
            InboundEvent::Text(body) => {
                self.drive(user, DialogEvent::TextReceived(body.clone())).await
            }
        }
    }

    /// Number of users with a live dialog state (for observability).
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn drive(
        &self,
        user: &UserProfile,
        event: DialogEvent,
    ) -> Result<Prompt, DomainError> {
        let session = self.session_for(user.user_id).await;
        // Single writer per user key: the lock queues same-user events in
        // arrival order without blocking other users.
        let mut state = session.lock().await;
        self.engine.apply(user, &mut state, event).await
    }

    async fn session_for(&self, user_id: UserId) -> Arc<Mutex<DialogState>> {
        if let Some(session) = self.sessions.read().await.get(&user_id) {
            return session.clone();
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(DialogState::new())))
            .clone()
    }

    /// Builds the admin report. Failures are reported to the requester
    /// as a prompt instead of propagating; no other user's conversation
    /// is affected.
    async fn stats(&self, user: &UserProfile) -> Prompt {
        if !self.admin_ids.contains(&user.user_id) {
            return Prompt::text("⛔ You don't have access to this command.");
        }

        match self.reviews.snapshot().await {
            Ok(snapshot) => {
                let report = ReportBuilder::new(&snapshot, Timestamp::now());
                Prompt::text(report.render_text())
            }
            Err(err) => {
                tracing::error!(error = %err, "report generation failed");
                Prompt::text(format!("⚠️ Failed to generate the report: {}", err))
            }
        }
    }
}

fn welcome_prompt() -> Prompt {
    Prompt::with_menu(
        "👋 Welcome to the feedback and ratings bot!\n\n\
         You can use these commands:\n\
         📝 /leave_feedback - leave feedback on a product or service\n\
         👁️ /view_feedback - browse feedback on a product or service\n\
         ⭐ /rate - score a product or service\n\n\
         Your opinion matters to us!",
        menus::main_menu(),
    )
}
