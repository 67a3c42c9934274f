//! Inbound events delivered by the messaging collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ActorId, ChatId};

const START_COMMAND: &str = "/start";

/// One unit of user input, tagged with where it came from and who sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat: ChatId,
    pub actor: ActorId,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn new(chat: ChatId, actor: ActorId, kind: EventKind) -> Self {
        Self { chat, actor, kind }
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The `/start` command.
    Start,
    /// A method-choice button press.
    Choice(MethodChoice),
    /// An uploaded photo.
    Image(ImageRef),
    /// Any other text message.
    Text(String),
}

impl EventKind {
    /// Classifies a text message as the start command or free text.
    ///
    /// `/start` may carry a bot mention (`/start@my_bot`) or a payload
    /// after a space.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let command = text
            .split_whitespace()
            .next()
            .map(|word| word.split('@').next().unwrap_or(word));
        if command == Some(START_COMMAND) {
            EventKind::Start
        } else {
            EventKind::Text(text)
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Choice(_) => "choice",
            EventKind::Image(_) => "image",
            EventKind::Text(_) => "text",
        }
    }
}

/// The two ways to register a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodChoice {
    Manual,
    Photo,
}

impl MethodChoice {
    /// Callback token carried by the button.
    pub fn token(&self) -> &'static str {
        match self {
            MethodChoice::Manual => "manual_entry",
            MethodChoice::Photo => "photo_entry",
        }
    }

    /// Parses a callback token; unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "manual_entry" => Some(MethodChoice::Manual),
            "photo_entry" => Some(MethodChoice::Photo),
            _ => None,
        }
    }
}

/// Opaque handle the messaging collaborator resolves to image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
