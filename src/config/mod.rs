//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `EXPIRY_REMINDER` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use expiry_reminder::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Reminders go to {}", config.calendar.calendar_id);
//! ```

mod access;
mod barcode;
mod calendar;
mod error;
mod ocr;
mod products;
mod service;
mod telegram;

pub use access::AccessSettings;
pub use barcode::BarcodeSettings;
pub use calendar::CalendarSettings;
pub use error::{ConfigError, ValidationError};
pub use ocr::OcrSettings;
pub use products::ProductsSettings;
pub use service::{LogFormat, ServiceConfig};
pub use telegram::TelegramSettings;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Logging, timeouts and temp files
    #[serde(default)]
    pub service: ServiceConfig,

    /// Chat transport (Telegram Bot API)
    pub telegram: TelegramSettings,

    /// Expiration date OCR (OCR.space)
    pub ocr: OcrSettings,

    /// Product lookup (Open Food Facts)
    #[serde(default)]
    pub products: ProductsSettings,

    /// Reminder calendar (Google Calendar)
    pub calendar: CalendarSettings,

    /// Barcode decoding (zbarimg)
    #[serde(default)]
    pub barcode: BarcodeSettings,

    /// Authorized actors
    pub access: AccessSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EXPIRY_REMINDER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `EXPIRY_REMINDER__TELEGRAM__BOT_TOKEN=...` -> `telegram.bot_token = ...`
    /// - `EXPIRY_REMINDER__ACCESS__AUTHORIZED_USERS=1,2` -> `access.authorized_users = "1,2"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EXPIRY_REMINDER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.service.validate()?;
        self.telegram.validate()?;
        self.ocr.validate()?;
        self.products.validate()?;
        self.calendar.validate()?;
        self.barcode.validate()?;
        self.access.validate()?;
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "EXPIRY_REMINDER__TELEGRAM__BOT_TOKEN",
        "EXPIRY_REMINDER__OCR__API_KEY",
        "EXPIRY_REMINDER__CALENDAR__CALENDAR_ID",
        "EXPIRY_REMINDER__CALENDAR__TIMEZONE",
        "EXPIRY_REMINDER__ACCESS__AUTHORIZED_USERS",
        "EXPIRY_REMINDER__SERVICE__CALL_TIMEOUT_SECS",
        "EXPIRY_REMINDER__SERVICE__LOG_FORMAT",
    ];

    /// Helper to set environment variables for testing
    fn set_minimal_env() {
        env::set_var("EXPIRY_REMINDER__TELEGRAM__BOT_TOKEN", "123456:ABC-DEF");
        env::set_var("EXPIRY_REMINDER__OCR__API_KEY", "K8812345");
        env::set_var("EXPIRY_REMINDER__CALENDAR__CALENDAR_ID", "primary");
        env::set_var("EXPIRY_REMINDER__ACCESS__AUTHORIZED_USERS", "1001,1002");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.telegram.bot_token.expose_secret(), "123456:ABC-DEF");
        assert_eq!(config.calendar.calendar_id, "primary");
        assert_eq!(config.access.actor_ids().unwrap().len(), 2);
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.service.call_timeout_secs, 30);
        assert_eq!(config.calendar.timezone, "Europe/Madrid");
        assert_eq!(config.ocr.language, "spa");
        assert_eq!(config.ocr.engine, 2);
        assert_eq!(config.barcode.command, "zbarimg");
        assert_eq!(config.products.base_url, "https://world.openfoodfacts.org");
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("EXPIRY_REMINDER__SERVICE__CALL_TIMEOUT_SECS", "10");
        env::set_var("EXPIRY_REMINDER__SERVICE__LOG_FORMAT", "json");
        env::set_var("EXPIRY_REMINDER__CALENDAR__TIMEZONE", "America/Santiago");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.service.call_timeout_secs, 10);
        assert_eq!(config.service.log_format, LogFormat::Json);
        assert_eq!(config.calendar.tz().unwrap(), chrono_tz::America::Santiago);
    }

    #[test]
    fn test_missing_required_section_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("EXPIRY_REMINDER__OCR__API_KEY", "K8812345");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timezone_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("EXPIRY_REMINDER__CALENDAR__TIMEZONE", "Nowhere/Land");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTimezone("Nowhere/Land".to_string()))
        );
    }

    #[test]
    fn test_secrets_hidden_from_debug() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let debug = format!("{:?}", result.unwrap());
        assert!(!debug.contains("ABC-DEF"));
        assert!(!debug.contains("K8812345"));
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://api.telegram.org"));
        assert!(is_http_url("http://localhost:8080/x"));
        assert!(!is_http_url("api.telegram.org"));
        assert!(!is_http_url("file:///etc/passwd"));
    }
}
