//! Telegram configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::is_http_url;

/// Telegram Bot API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSettings {
    /// Bot token from @BotFather
    pub bot_token: Secret<String>,

    /// Bot API root
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Long-poll timeout in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl TelegramSettings {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("telegram.bot_token"));
        }
        if !is_http_url(&self.api_base_url) {
            return Err(ValidationError::InvalidUrl("telegram.api_base_url"));
        }
        // Telegram caps long polling at 50 seconds.
        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > 50 {
            return Err(ValidationError::InvalidPollTimeout);
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(token: &str) -> TelegramSettings {
        TelegramSettings {
            bot_token: Secret::new(token.to_string()),
            api_base_url: default_api_base_url(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }

    #[test]
    fn valid_settings_pass() {
        assert!(settings("123:abc").validate().is_ok());
    }

    #[test]
    fn blank_token_is_missing() {
        assert_eq!(
            settings("  ").validate(),
            Err(ValidationError::MissingRequired("telegram.bot_token"))
        );
    }

    #[test]
    fn poll_timeout_is_capped() {
        let mut s = settings("123:abc");
        s.poll_timeout_secs = 60;
        assert_eq!(s.validate(), Err(ValidationError::InvalidPollTimeout));
    }
}
