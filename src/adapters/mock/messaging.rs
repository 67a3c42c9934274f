//! Mock chat transport.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::{ImageRef, InboundEvent, OutboundMessage};
use crate::domain::foundation::ChatId;
use crate::ports::{MessagingError, MessagingGateway, UpdateSource};

/// A message recorded by [`MockMessaging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat: ChatId,
    pub message: OutboundMessage,
}

/// Records outbound messages and serves image bytes from memory.
#[derive(Debug, Clone, Default)]
pub struct MockMessaging {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    images: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    send_error: Option<MessagingError>,
}

impl MockMessaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `image` downloadable with the given bytes.
    pub fn with_image(self, image: &ImageRef, bytes: impl Into<Vec<u8>>) -> Self {
        self.images
            .lock()
            .unwrap()
            .insert(image.as_str().to_string(), bytes.into());
        self
    }

    /// Every send fails with `error`. Sends are still recorded.
    pub fn failing_sends(mut self, error: MessagingError) -> Self {
        self.send_error = Some(error);
        self
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Text of every message sent to `chat`, in order.
    pub fn texts_for(&self, chat: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat == chat)
            .map(|m| m.message.text.clone())
            .collect()
    }

    /// Text of the most recent message sent to `chat`.
    pub fn last_text_for(&self, chat: ChatId) -> Option<String> {
        self.texts_for(chat).pop()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl MessagingGateway for MockMessaging {
    async fn send(&self, chat: ChatId, message: OutboundMessage) -> Result<(), MessagingError> {
        self.sent.lock().unwrap().push(SentMessage { chat, message });
        match &self.send_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn download_image(&self, image: &ImageRef) -> Result<Vec<u8>, MessagingError> {
        self.images
            .lock()
            .unwrap()
            .get(image.as_str())
            .cloned()
            .ok_or_else(|| MessagingError::FileUnavailable(image.to_string()))
    }
}

/// Serves queued batches of inbound events, then empty batches.
#[derive(Debug, Clone)]
pub struct MockUpdateSource {
    batches: Arc<Mutex<VecDeque<Result<Vec<InboundEvent>, MessagingError>>>>,
    idle_delay: Duration,
}

impl Default for MockUpdateSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockUpdateSource {
    pub fn new() -> Self {
        Self {
            batches: Arc::new(Mutex::new(VecDeque::new())),
            idle_delay: Duration::from_millis(10),
        }
    }

    pub fn with_batch(self, events: Vec<InboundEvent>) -> Self {
        self.batches.lock().unwrap().push_back(Ok(events));
        self
    }

    pub fn with_error(self, error: MessagingError) -> Self {
        self.batches.lock().unwrap().push_back(Err(error));
        self
    }

    /// Number of queued batches not yet served.
    pub fn pending(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait]
impl UpdateSource for MockUpdateSource {
    async fn next_batch(&self) -> Result<Vec<InboundEvent>, MessagingError> {
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(batch) => batch,
            None => {
                // Stands in for a long-poll that returned nothing.
                sleep(self.idle_delay).await;
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_messages_per_chat() {
        let messaging = MockMessaging::new();
        messaging
            .send(ChatId::new(1), OutboundMessage::text("hello"))
            .await
            .unwrap();
        messaging
            .send(ChatId::new(2), OutboundMessage::text("other"))
            .await
            .unwrap();

        assert_eq!(messaging.texts_for(ChatId::new(1)), vec!["hello"]);
        assert_eq!(messaging.sent().len(), 2);
    }

    #[tokio::test]
    async fn unknown_image_is_unavailable() {
        let messaging = MockMessaging::new();
        let result = messaging.download_image(&ImageRef::new("missing")).await;
        assert!(matches!(result, Err(MessagingError::FileUnavailable(_))));
    }

    #[tokio::test]
    async fn update_source_drains_batches_in_order() {
        let source = MockUpdateSource::new()
            .with_error(MessagingError::network("down"))
            .with_batch(Vec::new());

        assert!(source.next_batch().await.is_err());
        assert!(source.next_batch().await.unwrap().is_empty());
        assert_eq!(source.pending(), 0);
    }
}
