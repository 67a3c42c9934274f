//! Date normalization for recognized and typed expiration dates.
//!
//! Two entry points with deliberately different strictness:
//!
//! - [`DateNormalizer::scan`] looks for the first date-shaped substring in
//!   OCR output, which is usually surrounded by lot numbers and labels.
//! - [`DateNormalizer::parse_manual`] requires the whole typed message to
//!   be a date and only accepts `/` for full dates.
//!
//! Month-only tokens resolve to the first day of that month.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DateError, ExpirationDate};

/// Alternation order matters: leftmost match wins and, at the same
/// position, full dates are tried before month-only ones.
static SCAN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{2}/[0-9]{2}/[0-9]{4}|[0-9]{2}-[0-9]{2}-[0-9]{4}|[0-9]{2}/[0-9]{4}|[0-9]{2}-[0-9]{4}")
        .expect("scan pattern is valid")
});

static MANUAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9]{2}/[0-9]{2}/[0-9]{4}|[0-9]{2}[/-][0-9]{4})$")
        .expect("manual pattern is valid")
});

const FULL_TOKEN_LEN: usize = 10;

/// Turns raw date tokens into [`ExpirationDate`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateNormalizer;

impl DateNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Finds the first date in recognized text.
    ///
    /// # Errors
    ///
    /// Returns `DateError::NoDateFound` when nothing date-shaped appears.
    pub fn scan(&self, text: &str) -> Result<ExpirationDate, DateError> {
        SCAN_PATTERN
            .find(text)
            .map(|m| Self::from_token(m.as_str()))
            .ok_or(DateError::NoDateFound)
    }

    /// Parses a date typed by the user.
    ///
    /// Accepts `DD/MM/YYYY`, `MM/YYYY` and `MM-YYYY`. The whole message must
    /// be the date, with one deliberate leniency: leading and trailing
    /// whitespace is trimmed first, so `" 15/03/2026\n"` is accepted. Any
    /// other surrounding text is rejected.
    ///
    /// # Errors
    ///
    /// Returns `DateError::InvalidFormat` for anything else.
    pub fn parse_manual(&self, text: &str) -> Result<ExpirationDate, DateError> {
        let candidate = text.trim();
        if MANUAL_PATTERN.is_match(candidate) {
            Ok(Self::from_token(candidate))
        } else {
            Err(DateError::invalid_format(text))
        }
    }

    fn from_token(token: &str) -> ExpirationDate {
        if token.len() == FULL_TOKEN_LEN {
            ExpirationDate::from_full_token(token)
        } else {
            ExpirationDate::from_month_token(token)
        }
    }
}
