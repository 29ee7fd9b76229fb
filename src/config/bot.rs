//! Bot configuration - gateway secret, admin list, dialog tuning.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::UserId;

use super::error::ValidationError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Shared secret the transport signs event posts with
    pub signing_secret: SecretString,

    /// Comma-separated platform ids allowed to run /stats
    #[serde(default)]
    pub admin_ids: String,

    /// Feedback entries shown per item view
    #[serde(default = "default_feedback_page_size")]
    pub feedback_page_size: u32,
}

impl BotConfig {
    /// Returns the raw signing secret bytes.
    pub fn signing_secret(&self) -> &str {
        self.signing_secret.expose_secret()
    }

    /// Parses the admin id list. Call after `validate()`.
    pub fn admin_ids(&self) -> Vec<UserId> {
        self.admin_ids
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| entry.parse().ok())
            .collect()
    }

    /// Validate bot configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.signing_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("BOT_SIGNING_SECRET"));
        }
        for entry in self
            .admin_ids
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
        {
            if entry.parse::<i64>().is_err() {
                return Err(ValidationError::InvalidAdminId(entry.to_string()));
            }
        }
        if self.feedback_page_size == 0 || self.feedback_page_size > 50 {
            return Err(ValidationError::InvalidFeedbackPageSize);
        }
        Ok(())
    }
}

fn default_feedback_page_size() -> u32 {
    10
}
