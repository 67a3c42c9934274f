//! Telegram Bot API transport.

mod client;
mod wire;

pub use client::{TelegramBot, TelegramConfig};
