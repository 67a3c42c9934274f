//! Messaging Port - Interface for the chat transport.
//!
//! The transport delivers inbound events (commands, button presses,
//! photos, text) and accepts replies. It also resolves image references to
//! downloadable bytes.
//!
//! Two traits because the engine only ever talks back, while the service
//! loop is the only place that pulls events in.

use async_trait::async_trait;

use crate::domain::conversation::{ImageRef, InboundEvent, OutboundMessage};
use crate::domain::foundation::ChatId;

/// Port for replying to chats and fetching uploaded images.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Sends a reply to a chat.
    async fn send(&self, chat: ChatId, message: OutboundMessage) -> Result<(), MessagingError>;

    /// Downloads the bytes behind an image reference.
    async fn download_image(&self, image: &ImageRef) -> Result<Vec<u8>, MessagingError>;
}

/// Port for receiving inbound events.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Waits for the next batch of events, in arrival order.
    ///
    /// May return an empty batch when the wait times out with nothing new.
    async fn next_batch(&self) -> Result<Vec<InboundEvent>, MessagingError>;
}

/// Messaging transport errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MessagingError {
    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// The transport answered with an error.
    #[error("api error {code}: {description}")]
    Api { code: u16, description: String },

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Failed to parse transport response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The referenced file cannot be downloaded.
    #[error("file unavailable: {0}")]
    FileUnavailable(String),
}

impl MessagingError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn api(code: u16, description: impl Into<String>) -> Self {
        Self::Api {
            code,
            description: description.into(),
        }
    }
}
