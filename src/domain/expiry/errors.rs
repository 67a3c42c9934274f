//! Date recognition errors.

use thiserror::Error;

/// Why a date token could not be turned into an expiration date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Recognized text contains nothing date-shaped.
    #[error("No date found in recognized text")]
    NoDateFound,

    /// Typed input is not one of the accepted shapes.
    #[error("'{input}' is not a valid date, expected DD/MM/YYYY or MM/YYYY")]
    InvalidFormat { input: String },

    /// Well-shaped token that names no real day, such as 31/02/2026.
    #[error("'{date}' is not a calendar date")]
    NotACalendarDate { date: String },
}

impl DateError {
    pub fn invalid_format(input: impl Into<String>) -> Self {
        DateError::InvalidFormat {
            input: input.into(),
        }
    }
}
