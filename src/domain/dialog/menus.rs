//! Menu builders - the structured keyboards offered at each dialog step.

use crate::domain::catalog::{Category, Item};
use crate::domain::foundation::{ItemId, Score};

use super::event::{CallbackToken, Command};
use super::{Menu, MenuButton, Purpose};

/// Main menu listing the dialog-starting commands.
pub fn main_menu() -> Menu {
    let buttons = [Command::LeaveFeedback, Command::ViewFeedback, Command::Rate]
        .into_iter()
        .map(|cmd| MenuButton::new(cmd.to_string(), cmd.as_str()))
        .collect();
    Menu::new(buttons, 1)
}

/// Category picker, two buttons per row.
pub fn categories_menu() -> Menu {
    let buttons = Category::ALL
        .into_iter()
        .map(|category| {
            MenuButton::new(category.label(), CallbackToken::Category(category).encode())
        })
        .collect();
    Menu::new(buttons, 2)
}

/// Item picker for one category, one button per row plus a back button.
///
/// Every item token carries the dialog purpose so a later tap can never
/// be misread against a different flow.
pub fn items_menu(items: &[Item], purpose: Purpose) -> Menu {
    let mut buttons: Vec<MenuButton> = items
        .iter()
        .map(|item| {
            MenuButton::new(
                item.name.clone(),
                CallbackToken::Item {
                    id: item.id,
                    purpose,
                }
                .encode(),
            )
        })
        .collect();
    buttons.push(back_button());
    Menu::new(buttons, 1)
}

/// Score keyboard: five score buttons in one row, cancel below.
pub fn score_menu(item_id: ItemId) -> Menu {
    let mut buttons: Vec<MenuButton> = Score::ALL
        .into_iter()
        .map(|score| {
            MenuButton::new(
                format!("{} {}", score.value(), score.stars()),
                CallbackToken::Score {
                    item_id,
                    value: score.value() as i64,
                }
                .encode(),
            )
        })
        .collect();
    buttons.push(MenuButton::new("❌ Cancel", CallbackToken::Cancel.encode()));
    Menu::new(buttons, 5)
}

/// A single back-to-categories button.
pub fn back_menu() -> Menu {
    Menu::new(vec![back_button()], 1)
}

fn back_button() -> MenuButton {
    MenuButton::new("◀️ Back to categories", CallbackToken::Back.encode())
}
