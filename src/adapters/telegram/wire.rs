//! Bot API wire types and their mapping to inbound events.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{
    EventKind, ImageRef, InboundEvent, Keyboard, MethodChoice, OutboundMessage,
};
use crate::domain::foundation::{ActorId, ChatId};

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub(super) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct User {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct File {
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct GetUpdates<'a> {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub(super) struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub(super) struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
pub(super) struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl SendMessage {
    pub fn new(chat: ChatId, message: OutboundMessage) -> Self {
        Self {
            chat_id: chat.value(),
            text: message.text,
            reply_markup: message.keyboard.map(InlineKeyboardMarkup::from),
        }
    }
}

impl From<Keyboard> for InlineKeyboardMarkup {
    /// One button per row, as a vertical menu.
    fn from(keyboard: Keyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .buttons()
                .into_iter()
                .map(|button| {
                    vec![InlineKeyboardButton {
                        text: button.label.to_string(),
                        callback_data: button.token.to_string(),
                    }]
                })
                .collect(),
        }
    }
}

/// What an update means for the flow.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct Decoded {
    pub event: Option<InboundEvent>,
    /// Callback query to acknowledge so the client stops its spinner.
    pub callback_id: Option<String>,
}

impl Update {
    /// Maps an update to an inbound event. Updates the flow has no use for
    /// (stickers, edits, unknown button tokens) decode to `None`.
    pub fn decode(self) -> Decoded {
        if let Some(query) = self.callback_query {
            let chat = query
                .message
                .as_ref()
                .map(|m| m.chat.id)
                .unwrap_or(query.from.id);
            let event = query
                .data
                .as_deref()
                .and_then(MethodChoice::from_token)
                .map(|choice| {
                    InboundEvent::new(
                        ChatId::new(chat),
                        ActorId::new(query.from.id),
                        EventKind::Choice(choice),
                    )
                });
            return Decoded {
                event,
                callback_id: Some(query.id),
            };
        }

        let event = self.message.and_then(|message| {
            let actor = ActorId::new(message.from.as_ref()?.id);
            let chat = ChatId::new(message.chat.id);
            let kind = if let Some(photo) = message.photo.and_then(largest_photo) {
                EventKind::Image(ImageRef::new(photo.file_id))
            } else {
                EventKind::from_text(message.text?)
            };
            Some(InboundEvent::new(chat, actor, kind))
        });

        Decoded {
            event,
            callback_id: None,
        }
    }
}

/// Telegram sends several sizes of each photo; the biggest reads best.
fn largest_photo(sizes: Vec<PhotoSize>) -> Option<PhotoSize> {
    sizes.into_iter().max_by_key(|p| {
        p.file_size
            .unwrap_or(u64::from(p.width) * u64::from(p.height))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Decoded {
        serde_json::from_str::<Update>(json).unwrap().decode()
    }

    #[test]
    fn envelope_carries_update_batch() {
        let envelope: ApiResponse<Vec<Update>> = serde_json::from_str(
            r#"{"ok":true,"result":[{"update_id":9,"message":{"chat":{"id":42},"from":{"id":7},"text":"hi"}}]}"#,
        )
        .unwrap();
        assert!(envelope.ok);
        let updates = envelope.result.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 9);
    }

    #[test]
    fn error_envelope_has_no_result() {
        let envelope: ApiResponse<Update> = serde_json::from_str(
            r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#,
        )
        .unwrap();
        assert!(!envelope.ok);
        assert!(envelope.result.is_none());
        assert_eq!(envelope.error_code, Some(401));
        assert_eq!(envelope.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn text_message_becomes_text_event() {
        let decoded = decode(
            r#"{"update_id":1,"message":{"message_id":5,"chat":{"id":42,"type":"private"},
                "from":{"id":7,"is_bot":false,"first_name":"A"},"text":"15/03/2026"}}"#,
        );
        assert_eq!(
            decoded.event,
            Some(InboundEvent::new(
                ChatId::new(42),
                ActorId::new(7),
                EventKind::Text("15/03/2026".to_string())
            ))
        );
        assert!(decoded.callback_id.is_none());
    }

    #[test]
    fn start_command_is_recognized() {
        let decoded = decode(
            r#"{"update_id":1,"message":{"chat":{"id":42},"from":{"id":7},"text":"/start"}}"#,
        );
        assert_eq!(decoded.event.unwrap().kind, EventKind::Start);
    }

    #[test]
    fn largest_photo_is_chosen() {
        let decoded = decode(
            r#"{"update_id":2,"message":{"chat":{"id":42},"from":{"id":7},"photo":[
                {"file_id":"small","width":90,"height":60,"file_size":1200},
                {"file_id":"large","width":1280,"height":853,"file_size":98000},
                {"file_id":"medium","width":320,"height":213,"file_size":14000}]}}"#,
        );
        assert_eq!(
            decoded.event.unwrap().kind,
            EventKind::Image(ImageRef::new("large"))
        );
    }

    #[test]
    fn button_press_becomes_choice_and_is_acknowledged() {
        let decoded = decode(
            r#"{"update_id":3,"callback_query":{"id":"cb-1","from":{"id":7},
                "message":{"chat":{"id":42}},"data":"photo_entry"}}"#,
        );
        assert_eq!(decoded.callback_id.as_deref(), Some("cb-1"));
        let event = decoded.event.unwrap();
        assert_eq!(event.chat, ChatId::new(42));
        assert_eq!(event.kind, EventKind::Choice(MethodChoice::Photo));
    }

    #[test]
    fn unknown_button_token_is_acknowledged_but_dropped() {
        let decoded = decode(
            r#"{"update_id":3,"callback_query":{"id":"cb-2","from":{"id":7},"data":"other"}}"#,
        );
        assert!(decoded.event.is_none());
        assert_eq!(decoded.callback_id.as_deref(), Some("cb-2"));
    }

    #[test]
    fn sticker_is_ignored() {
        let decoded = decode(
            r#"{"update_id":4,"message":{"chat":{"id":42},"from":{"id":7},"sticker":{}}}"#,
        );
        assert!(decoded.event.is_none());
    }

    #[test]
    fn method_choice_renders_inline_keyboard() {
        let body = SendMessage::new(ChatId::new(42), OutboundMessage::method_choice());
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["chat_id"], 42);
        assert_eq!(
            value["reply_markup"]["inline_keyboard"][0][0]["callback_data"],
            "manual_entry"
        );
        assert_eq!(
            value["reply_markup"]["inline_keyboard"][1][0]["callback_data"],
            "photo_entry"
        );
    }

    #[test]
    fn plain_text_has_no_markup() {
        let body = SendMessage::new(ChatId::new(42), OutboundMessage::text("hi"));
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("reply_markup").is_none());
    }

    #[test]
    fn error_envelope_parses() {
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(
            r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#,
        )
        .unwrap();
        assert!(!response.ok);
        assert_eq!(response.error_code, Some(401));
        assert!(response.result.is_none());
    }
}
