//! Outbound replies handed to the messaging collaborator.

use super::copy;
use super::MethodChoice;

/// A reply: plain text, optionally with the method-choice buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    /// Plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    /// The method-choice prompt with its two buttons.
    pub fn method_choice() -> Self {
        Self {
            text: copy::CHOOSE_METHOD.to_string(),
            keyboard: Some(Keyboard::MethodChoice),
        }
    }
}

/// The fixed button sets the flow can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    MethodChoice,
}

/// A single button: visible label and callback token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub token: &'static str,
}

impl Keyboard {
    /// Buttons in display order, laid out on one row.
    pub fn buttons(&self) -> Vec<Button> {
        match self {
            Keyboard::MethodChoice => vec![
                Button {
                    label: copy::BUTTON_MANUAL,
                    token: MethodChoice::Manual.token(),
                },
                Button {
                    label: copy::BUTTON_PHOTO,
                    token: MethodChoice::Photo.token(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_choice_carries_both_buttons() {
        let message = OutboundMessage::method_choice();
        let buttons = message.keyboard.unwrap().buttons();
        let tokens: Vec<_> = buttons.iter().map(|b| b.token).collect();
        assert_eq!(tokens, vec!["manual_entry", "photo_entry"]);
    }

    #[test]
    fn text_has_no_keyboard() {
        assert_eq!(OutboundMessage::text("hi").keyboard, None);
    }
}
