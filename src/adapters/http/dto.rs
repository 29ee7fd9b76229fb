//! HTTP DTOs for the event gateway.
//!
//! These types decouple the wire format from domain types; parsing
//! failures become 400 responses before anything reaches the dispatcher.

use serde::{Deserialize, Serialize};

use crate::domain::dialog::{
    CallbackToken, Command, InboundEnvelope, InboundEvent, Menu, Prompt,
};
use crate::domain::foundation::{Timestamp, UserId, ValidationError};
use crate::domain::user::UserProfile;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// The sender identity attached to every inbound event.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Discriminator for the inbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKindDto {
    Command,
    Callback,
    Text,
}

/// A normalized inbound event as posted by the transport.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEventDto {
    pub user: UserDto,
    pub kind: EventKindDto,
    #[serde(default)]
    pub payload: Option<String>,
}

impl InboundEventDto {
    /// Validates the DTO into a dispatchable envelope.
    pub fn into_envelope(self) -> Result<InboundEnvelope, ValidationError> {
        let payload = self
            .payload
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ValidationError::empty_field("payload"))?;

        let event = match self.kind {
            EventKindDto::Command => {
                let command: Command = payload.parse()?;
                InboundEvent::Command(command)
            }
            EventKindDto::Callback => {
                let token: CallbackToken = payload.parse()?;
                InboundEvent::Callback(token)
            }
            EventKindDto::Text => InboundEvent::Text(payload.to_string()),
        };

        let user = UserProfile::new(
            UserId::new(self.user.id),
            self.user.username,
            self.user.first_name,
            self.user.last_name,
            Timestamp::now(),
        );

        Ok(InboundEnvelope::new(user, event))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Outbound prompt, rendered by the transport.
#[derive(Debug, Clone, Serialize)]
pub struct PromptDto {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<Menu>,
}

impl From<Prompt> for PromptDto {
    fn from(prompt: Prompt) -> Self {
        Self {
            text: prompt.text,
            menu: prompt.menu,
        }
    }
}

/// Error body for rejected or failed requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDto {
    pub error: String,
    pub message: String,
}

impl ErrorDto {
    /// Creates an error body.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialog::Purpose;
    use crate::domain::foundation::ItemId;

    fn dto(kind: EventKindDto, payload: Option<&str>) -> InboundEventDto {
        InboundEventDto {
            user: UserDto {
                id: 42,
                username: Some("alice".to_string()),
                first_name: None,
                last_name: None,
            },
            kind,
            payload: payload.map(String::from),
        }
    }

    #[test]
    fn command_payload_parses_into_command_event() {
        let envelope = dto(EventKindDto::Command, Some("/rate"))
            .into_envelope()
            .unwrap();
        assert_eq!(envelope.event, InboundEvent::Command(Command::Rate));
        assert_eq!(envelope.user.user_id, UserId::new(42));
    }

    #[test]
    fn callback_payload_parses_into_token_event() {
        let envelope = dto(EventKindDto::Callback, Some("item:5:rate"))
            .into_envelope()
            .unwrap();
        assert_eq!(
            envelope.event,
            InboundEvent::Callback(CallbackToken::Item {
                id: ItemId::new(5),
                purpose: Purpose::Rate,
            })
        );
    }

    #[test]
    fn text_payload_passes_through() {
        let envelope = dto(EventKindDto::Text, Some("loved it"))
            .into_envelope()
            .unwrap();
        assert_eq!(envelope.event, InboundEvent::Text("loved it".to_string()));
    }

    #[test]
    fn missing_payload_is_rejected() {
        assert!(dto(EventKindDto::Text, None).into_envelope().is_err());
        assert!(dto(EventKindDto::Command, Some("   "))
            .into_envelope()
            .is_err());
    }

    #[test]
    fn malformed_callback_is_rejected() {
        assert!(dto(EventKindDto::Callback, Some("item:abc:rate"))
            .into_envelope()
            .is_err());
    }

    #[test]
    fn kind_deserializes_from_snake_case() {
        let dto: InboundEventDto = serde_json::from_str(
            r#"{"user":{"id":1},"kind":"callback","payload":"back"}"#,
        )
        .unwrap();
        assert_eq!(dto.kind, EventKindDto::Callback);
    }
}
