//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the registration flow to external systems:
//! - `telegram` - Bot API long polling and replies
//! - `recognition` - OCR.space text recognition, zbarimg barcode decoding
//! - `catalog` - Open Food Facts product lookup
//! - `calendar` - Google Calendar event creation
//! - `mock` - In-memory doubles for every port

pub mod calendar;
pub mod catalog;
pub mod mock;
pub mod recognition;
pub mod telegram;

pub use calendar::{GoogleCalendarClient, GoogleCalendarConfig, ServiceAccountKey};
pub use catalog::{OpenFoodFactsCatalog, OpenFoodFactsConfig};
pub use recognition::{OcrSpaceConfig, OcrSpaceRecognizer, ZbarDecoder};
pub use telegram::{TelegramBot, TelegramConfig};
