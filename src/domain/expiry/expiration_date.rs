//! Canonical expiration date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::DateError;

/// A fully specified day/month/year token.
///
/// Holds the canonical text alongside its numeric parts. The parts are only
/// syntactically checked; [`ExpirationDate::calendar_date`] is where an
/// impossible day such as `31/02/2026` surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationDate {
    text: String,
    day: u32,
    month: u32,
    year: i32,
}

impl ExpirationDate {
    /// Builds a date from a ten-character `DD?MM?YYYY` token, keeping the
    /// token's own separator.
    pub(super) fn from_full_token(token: &str) -> Self {
        Self {
            text: token.to_string(),
            day: digits(&token[0..2]),
            month: digits(&token[3..5]),
            year: digits(&token[6..10]) as i32,
        }
    }

    /// Widens a seven-character `MM?YYYY` token to the first of the month,
    /// always rendered with `/`.
    pub(super) fn from_month_token(token: &str) -> Self {
        let month = &token[0..2];
        let year = &token[3..7];
        Self {
            text: format!("01/{}/{}", month, year),
            day: 1,
            month: digits(month),
            year: digits(year) as i32,
        }
    }

    /// The canonical text, e.g. `01/03/2026`.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Converts to a concrete calendar day.
    ///
    /// # Errors
    ///
    /// Returns `DateError::NotACalendarDate` for days that do not exist.
    pub fn calendar_date(&self) -> Result<NaiveDate, DateError> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            DateError::NotACalendarDate {
                date: self.text.clone(),
            }
        })
    }
}

impl fmt::Display for ExpirationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// Callers only pass regex-matched ASCII digit runs.
fn digits(s: &str) -> u32 {
    s.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}
