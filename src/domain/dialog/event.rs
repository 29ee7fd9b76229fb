//! Inbound events - the normalized input the transport delivers.

use std::fmt;
use std::str::FromStr;

use crate::domain::catalog::Category;
use crate::domain::foundation::{EventId, ItemId, ValidationError};
use crate::domain::user::UserProfile;

use super::Purpose;

/// Stateless bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    LeaveFeedback,
    ViewFeedback,
    Rate,
    Stats,
}

impl Command {
    /// Returns the command name as typed by users (without the slash).
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::LeaveFeedback => "leave_feedback",
            Command::ViewFeedback => "view_feedback",
            Command::Rate => "rate",
            Command::Stats => "stats",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.as_str())
    }
}

impl FromStr for Command {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('/') {
            "start" => Ok(Command::Start),
            "leave_feedback" => Ok(Command::LeaveFeedback),
            "view_feedback" => Ok(Command::ViewFeedback),
            "rate" => Ok(Command::Rate),
            "stats" => Ok(Command::Stats),
            other => Err(ValidationError::invalid_format(
                "command",
                format!("unknown command '{}'", other),
            )),
        }
    }
}

/// Typed callback token carried in menu buttons.
///
/// Wire form is a short colon-separated string so the transport can treat
/// it as an opaque payload:
///
/// - `category:<slug>`
/// - `item:<id>:<purpose>`
/// - `score:<item_id>:<n>`
/// - `back`
/// - `cancel`
///
/// The score value is kept raw here; the state machine validates the
/// range and answers with a retry prompt instead of failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackToken {
    Category(Category),
    Item { id: ItemId, purpose: Purpose },
    Score { item_id: ItemId, value: i64 },
    Back,
    Cancel,
}

impl CallbackToken {
    /// Renders the token into its wire form.
    pub fn encode(&self) -> String {
        match self {
            CallbackToken::Category(category) => format!("category:{}", category.as_slug()),
            CallbackToken::Item { id, purpose } => format!("item:{}:{}", id, purpose),
            CallbackToken::Score { item_id, value } => format!("score:{}:{}", item_id, value),
            CallbackToken::Back => "back".to_string(),
            CallbackToken::Cancel => "cancel".to_string(),
        }
    }
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for CallbackToken {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |reason: &str| ValidationError::invalid_format("callback", reason.to_string());

        match s {
            "back" => return Ok(CallbackToken::Back),
            "cancel" => return Ok(CallbackToken::Cancel),
            _ => {}
        }

        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| bad("expected '<kind>:<payload>'"))?;

        match kind {
            "category" => {
                let category: Category = rest.parse()?;
                Ok(CallbackToken::Category(category))
            }
            "item" => {
                let (id, purpose) = rest
                    .split_once(':')
                    .ok_or_else(|| bad("expected 'item:<id>:<purpose>'"))?;
                let id: ItemId = id
                    .parse()
                    .map_err(|_| bad("item id is not a number"))?;
                let purpose: Purpose = purpose.parse()?;
                Ok(CallbackToken::Item { id, purpose })
            }
            "score" => {
                let (item_id, value) = rest
                    .split_once(':')
                    .ok_or_else(|| bad("expected 'score:<item_id>:<n>'"))?;
                let item_id: ItemId = item_id
                    .parse()
                    .map_err(|_| bad("item id is not a number"))?;
                let value: i64 = value
                    .parse()
                    .map_err(|_| bad("score is not a number"))?;
                Ok(CallbackToken::Score { item_id, value })
            }
            other => Err(bad(&format!("unknown token kind '{}'", other))),
        }
    }
}

/// A normalized inbound event from the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Command(Command),
    Callback(CallbackToken),
    Text(String),
}

/// An inbound event together with the identity that produced it.
#[derive(Debug, Clone)]
pub struct InboundEnvelope {
    pub event_id: EventId,
    pub user: UserProfile,
    pub event: InboundEvent,
}

impl InboundEnvelope {
    /// Wraps an event with a fresh correlation id.
    pub fn new(user: UserProfile, event: InboundEvent) -> Self {
        Self {
            event_id: EventId::new(),
            user,
            event,
        }
    }
}

/// Events the conversation state machine is driven by.
///
/// The dispatcher maps commands and callbacks onto these; the transition
/// table lives in the dialog engine.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    Start(Purpose),
    CategoryChosen(Category),
    ItemChosen { id: ItemId, purpose: Purpose },
    TextReceived(String),
    ScoreChosen { item_id: ItemId, value: i64 },
    Cancel,
    BackToCategories,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_parses_with_and_without_slash() {
        assert_eq!("/rate".parse::<Command>().unwrap(), Command::Rate);
        assert_eq!(
            "leave_feedback".parse::<Command>().unwrap(),
            Command::LeaveFeedback
        );
    }

    #[test]
    fn command_rejects_unknown_name() {
        assert!("help".parse::<Command>().is_err());
    }

    #[test]
    fn callback_tokens_round_trip() {
        let tokens = [
            CallbackToken::Category(Category::Smartphones),
            CallbackToken::Item {
                id: ItemId::new(5),
                purpose: Purpose::Rate,
            },
            CallbackToken::Score {
                item_id: ItemId::new(5),
                value: 4,
            },
            CallbackToken::Back,
            CallbackToken::Cancel,
        ];

        for token in tokens {
            let parsed: CallbackToken = token.encode().parse().unwrap();
            assert_eq!(parsed, token);
        }
    }

    #[test]
    fn callback_token_wire_forms_are_stable() {
        assert_eq!(
            CallbackToken::Category(Category::CustomerService).encode(),
            "category:customer-service"
        );
        assert_eq!(
            CallbackToken::Item {
                id: ItemId::new(7),
                purpose: Purpose::View,
            }
            .encode(),
            "item:7:view"
        );
        assert_eq!(
            CallbackToken::Score {
                item_id: ItemId::new(7),
                value: 5,
            }
            .encode(),
            "score:7:5"
        );
    }

    #[test]
    fn callback_token_keeps_out_of_range_score_raw() {
        // Range validation belongs to the state machine, which answers with
        // a retry prompt; the parser only checks the shape.
        let token: CallbackToken = "score:7:9".parse().unwrap();
        assert_eq!(
            token,
            CallbackToken::Score {
                item_id: ItemId::new(7),
                value: 9,
            }
        );
    }

    #[test]
    fn callback_token_rejects_malformed_payloads() {
        assert!("".parse::<CallbackToken>().is_err());
        assert!("category:".parse::<CallbackToken>().is_err());
        assert!("item:abc:rate".parse::<CallbackToken>().is_err());
        assert!("item:5".parse::<CallbackToken>().is_err());
        assert!("item:5:browse".parse::<CallbackToken>().is_err());
        assert!("score:5".parse::<CallbackToken>().is_err());
        assert!("promote:5".parse::<CallbackToken>().is_err());
    }

    #[test]
    fn envelope_assigns_fresh_event_ids() {
        let user = crate::domain::user::UserProfile::new(
            crate::domain::foundation::UserId::new(1),
            None,
            None,
            None,
            crate::domain::foundation::Timestamp::now(),
        );
        let a = InboundEnvelope::new(user.clone(), InboundEvent::Command(Command::Start));
        let b = InboundEnvelope::new(user, InboundEvent::Command(Command::Start));
        assert_ne!(a.event_id, b.event_id);
    }
}
