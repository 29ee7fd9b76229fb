//! Outbound prompt values handed back to the transport.

use serde::{Deserialize, Serialize};

/// One interactive button: a label plus an opaque callback token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuButton {
    pub label: String,
    pub token: String,
}

impl MenuButton {
    /// Creates a button.
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// A structured menu description the transport renders as buttons.
///
/// `columns` is the suggested grid width; trailing buttons wrap onto
/// further rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub buttons: Vec<MenuButton>,
    pub columns: u8,
}

impl Menu {
    /// Creates a menu with the given grid width.
    pub fn new(buttons: Vec<MenuButton>, columns: u8) -> Self {
        Self { buttons, columns }
    }
}

/// The outbound value produced by applying one inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<Menu>,
}

impl Prompt {
    /// A plain text prompt without buttons.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            menu: None,
        }
    }

    /// A prompt with an attached menu.
    pub fn with_menu(text: impl Into<String>, menu: Menu) -> Self {
        Self {
            text: text.into(),
            menu: Some(menu),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_prompt_has_no_menu() {
        let prompt = Prompt::text("Hello");
        assert_eq!(prompt.text, "Hello");
        assert!(prompt.menu.is_none());
    }

    #[test]
    fn prompt_serializes_menu_when_present() {
        let menu = Menu::new(vec![MenuButton::new("Back", "back")], 1);
        let prompt = Prompt::with_menu("Pick one:", menu);

        let json = serde_json::to_string(&prompt).unwrap();
        assert!(json.contains("\"token\":\"back\""));
        assert!(json.contains("\"columns\":1"));
    }

    #[test]
    fn prompt_omits_menu_field_when_absent() {
        let json = serde_json::to_string(&Prompt::text("hi")).unwrap();
        assert!(!json.contains("menu"));
    }
}
