//! Telegram Bot API client.
//!
//! Implements both sides of the chat transport: `UpdateSource` by long
//! polling `getUpdates`, and `MessagingGateway` via `sendMessage` and
//! `getFile`. The bot token is part of every URL, so request errors are
//! stripped of their URL before they are reported.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use crate::domain::conversation::{ImageRef, InboundEvent, OutboundMessage};
use crate::domain::foundation::ChatId;
use crate::ports::{MessagingError, MessagingGateway, UpdateSource};

use super::wire::{ApiResponse, File, GetUpdates, SendMessage, Update};

const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];
/// Extra time on top of the long-poll timeout before the HTTP client gives up.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Configuration for the Telegram client.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    bot_token: Secret<String>,
    /// API root (default: https://api.telegram.org).
    pub api_base_url: String,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: Secret<String>) -> Self {
        Self {
            bot_token,
            api_base_url: "https://api.telegram.org".to_string(),
            poll_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }
}

/// Telegram bot transport.
pub struct TelegramBot {
    config: TelegramConfig,
    client: Client,
    /// Next update id to request; everything below it is confirmed.
    offset: AtomicI64,
}

impl TelegramBot {
    pub fn new(config: TelegramConfig) -> Result<Self, MessagingError> {
        let client = Client::builder()
            .timeout(config.poll_timeout + POLL_GRACE)
            .build()
            .map_err(|e| MessagingError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            offset: AtomicI64::new(0),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base(),
            self.config.bot_token.expose_secret(),
            method
        )
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.base(),
            self.config.bot_token.expose_secret(),
            file_path
        )
    }

    fn base(&self) -> &str {
        self.config.api_base_url.trim_end_matches('/')
    }

    /// Calls a Bot API method and unwraps the `{ok, result}` envelope.
    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, MessagingError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            MessagingError::parse(format!(
                "{} returned unreadable body ({}): {}",
                method,
                status,
                e.without_url()
            ))
        })?;

        match (envelope.ok, envelope.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(MessagingError::api(
                envelope.error_code.unwrap_or(status.as_u16()),
                envelope
                    .description
                    .unwrap_or_else(|| format!("{} failed", method)),
            )),
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> MessagingError {
        if e.is_timeout() {
            MessagingError::Timeout {
                timeout_secs: (self.config.poll_timeout + POLL_GRACE).as_secs(),
            }
        } else {
            MessagingError::network(e.without_url().to_string())
        }
    }

    /// Stops the client's spinner on a pressed button. Failures only matter
    /// cosmetically, so they are logged and dropped.
    async fn acknowledge(&self, callback_id: &str) {
        let body = serde_json::json!({ "callback_query_id": callback_id });
        if let Err(e) = self
            .call::<_, serde_json::Value>("answerCallbackQuery", &body)
            .await
        {
            tracing::debug!(error = %e, "Failed to acknowledge button press");
        }
    }
}

#[async_trait]
impl UpdateSource for TelegramBot {
    async fn next_batch(&self) -> Result<Vec<InboundEvent>, MessagingError> {
        let request = GetUpdates {
            offset: self.offset.load(Ordering::SeqCst),
            timeout: self.config.poll_timeout.as_secs(),
            allowed_updates: ALLOWED_UPDATES,
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;

        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset.fetch_max(last + 1, Ordering::SeqCst);
        }

        let mut events = Vec::with_capacity(updates.len());
        for update in updates {
            let update_id = update.update_id;
            let decoded = update.decode();
            if let Some(callback_id) = decoded.callback_id {
                self.acknowledge(&callback_id).await;
            }
            match decoded.event {
                Some(event) => events.push(event),
                None => tracing::debug!(update_id, "Skipping update with no flow event"),
            }
        }
        Ok(events)
    }
}

#[async_trait]
impl MessagingGateway for TelegramBot {
    async fn send(&self, chat: ChatId, message: OutboundMessage) -> Result<(), MessagingError> {
        let body = SendMessage::new(chat, message);
        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn download_image(&self, image: &ImageRef) -> Result<Vec<u8>, MessagingError> {
        let body = serde_json::json!({ "file_id": image.as_str() });
        let file: File = self.call("getFile", &body).await?;
        let file_path = file
            .file_path
            .ok_or_else(|| MessagingError::FileUnavailable(image.to_string()))?;

        let response = self
            .client
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MessagingError::api(
                status.as_u16(),
                format!("file download failed for {}", image),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(bytes.to_vec())
    }
}
