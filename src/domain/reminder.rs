//! Reminder event planning.
//!
//! A reminder fires at local midnight two days before the expiration day,
//! in the configured calendar timezone. Start and end coincide: the event
//! is a zero-duration marker.

use chrono::{DateTime, Days, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

use crate::domain::expiry::{DateError, ExpirationDate};
use crate::domain::product::Product;

/// Days between the reminder and the expiration date.
pub const REMINDER_OFFSET_DAYS: u64 = 2;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Errors while turning an expiration date into a reminder instant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    #[error("Reminder date for {date} is out of range")]
    OutOfRange { date: String },

    #[error("No local time on {date} exists in {timezone}")]
    NonexistentLocalTime { date: NaiveDate, timezone: String },
}

/// A calendar reminder ready to be submitted. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEvent {
    title: String,
    trigger: DateTime<Tz>,
}

impl ReminderEvent {
    /// Plans the reminder for a product expiring on `expiry`.
    ///
    /// # Errors
    ///
    /// Fails when the date is not a real calendar day or when subtracting
    /// the offset leaves chrono's range. When a DST change in `timezone`
    /// skips local midnight, the reminder fires at the first instant that
    /// exists on that day instead.
    pub fn plan(
        product: &Product,
        expiry: &ExpirationDate,
        timezone: Tz,
    ) -> Result<Self, ReminderError> {
        let expiration_day = expiry.calendar_date()?;
        let reminder_day = expiration_day
            .checked_sub_days(Days::new(REMINDER_OFFSET_DAYS))
            .ok_or_else(|| ReminderError::OutOfRange {
                date: expiry.to_string(),
            })?;

        Ok(Self {
            title: product.name().to_string(),
            trigger: local_midnight(reminder_day, timezone)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The instant the reminder fires.
    pub fn trigger(&self) -> DateTime<Tz> {
        self.trigger
    }

    /// Event start; equal to the trigger.
    pub fn start(&self) -> DateTime<Tz> {
        self.trigger
    }

    /// Event end; equal to the start.
    pub fn end(&self) -> DateTime<Tz> {
        self.trigger
    }

    pub fn timezone(&self) -> Tz {
        self.trigger.timezone()
    }

    /// Local calendar day of the trigger, shown back to the user.
    pub fn trigger_date(&self) -> NaiveDate {
        self.trigger.date_naive()
    }
}

/// Start of `day` in `timezone`: midnight, or the first minute after a
/// skipped midnight.
fn local_midnight(day: NaiveDate, timezone: Tz) -> Result<DateTime<Tz>, ReminderError> {
    let midnight = day.and_time(NaiveTime::MIN);
    (0..MINUTES_PER_DAY)
        .map(|minute| midnight + Duration::minutes(minute))
        .find_map(|local| match timezone.from_local_datetime(&local) {
            LocalResult::Single(value) => Some(value),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => None,
        })
        .ok_or_else(|| ReminderError::NonexistentLocalTime {
            date: day,
            timezone: timezone.name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expiry::DateNormalizer;
    use chrono::{Timelike, Utc};
    use proptest::prelude::*;

    fn yogurt() -> Product {
        Product::named("Yogurt").unwrap()
    }

    fn madrid() -> Tz {
        chrono_tz::Europe::Madrid
    }

    #[test]
    fn trigger_is_two_days_before_at_midnight() {
        let expiry = DateNormalizer.parse_manual("15/03/2026").unwrap();
        let event = ReminderEvent::plan(&yogurt(), &expiry, madrid()).unwrap();

        assert_eq!(event.trigger_date(), NaiveDate::from_ymd_opt(2026, 3, 13).unwrap());
        assert_eq!(event.trigger().hour(), 0);
        assert_eq!(event.trigger().minute(), 0);
        assert_eq!(event.title(), "Yogurt");
    }

    #[test]
    fn month_only_date_crosses_into_previous_month() {
        let expiry = DateNormalizer.parse_manual("03/2026").unwrap();
        let event = ReminderEvent::plan(&yogurt(), &expiry, madrid()).unwrap();
        assert_eq!(event.trigger_date(), NaiveDate::from_ymd_opt(2026, 2, 27).unwrap());
    }

    #[test]
    fn start_and_end_coincide() {
        let expiry = DateNormalizer.parse_manual("10/10/2026").unwrap();
        let event = ReminderEvent::plan(&yogurt(), &expiry, madrid()).unwrap();
        assert_eq!(event.start(), event.end());
        assert_eq!(event.timezone(), madrid());
    }

    #[test]
    fn trigger_is_offset_from_utc_by_zone() {
        // Madrid is UTC+1 in March before the DST switch.
        let expiry = DateNormalizer.parse_manual("15/03/2026").unwrap();
        let event = ReminderEvent::plan(&yogurt(), &expiry, madrid()).unwrap();
        let utc = event.trigger().with_timezone(&Utc);
        assert_eq!(utc.to_rfc3339(), "2026-03-12T23:00:00+00:00");
    }

    #[test]
    fn dash_separated_scan_result_is_schedulable() {
        let expiry = DateNormalizer.scan("15-03-2026").unwrap();
        let event = ReminderEvent::plan(&yogurt(), &expiry, madrid()).unwrap();
        assert_eq!(event.trigger_date(), NaiveDate::from_ymd_opt(2026, 3, 13).unwrap());
    }

    #[test]
    fn impossible_date_fails_on_conversion() {
        let expiry = DateNormalizer.parse_manual("31/02/2026").unwrap();
        let result = ReminderEvent::plan(&yogurt(), &expiry, madrid());
        assert!(matches!(
            result,
            Err(ReminderError::InvalidDate(DateError::NotACalendarDate { .. }))
        ));
    }

    #[test]
    fn skipped_midnight_moves_to_first_valid_instant() {
        // Santiago de Chile springs forward at midnight (2026-09-06 00:00 -> 01:00).
        let expiry = DateNormalizer.parse_manual("08/09/2026").unwrap();
        let event =
            ReminderEvent::plan(&yogurt(), &expiry, chrono_tz::America::Santiago).unwrap();

        assert_eq!(event.trigger_date(), NaiveDate::from_ymd_opt(2026, 9, 6).unwrap());
        assert_eq!(event.trigger().to_rfc3339(), "2026-09-06T01:00:00-03:00");
        assert_eq!(event.start(), event.end());
    }

    #[test]
    fn repeated_midnight_takes_earlier_instant() {
        // Santiago falls back at midnight (2026-04-05 00:00 -> 2026-04-04 23:00),
        // so 2026-04-04 23:00 repeats but midnight of 04-05 is unique.
        let expiry = DateNormalizer.parse_manual("07/04/2026").unwrap();
        let event =
            ReminderEvent::plan(&yogurt(), &expiry, chrono_tz::America::Santiago).unwrap();
        assert_eq!(event.trigger_date(), NaiveDate::from_ymd_opt(2026, 4, 5).unwrap());
        assert_eq!(event.trigger().time(), NaiveTime::MIN);
    }

    proptest! {
        #[test]
        fn trigger_is_local_midnight_two_days_before(day_offset in 0u64..36_500) {
            let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            let day = base.checked_add_days(Days::new(day_offset)).unwrap();
            let token = day.format("%d/%m/%Y").to_string();
            let expiry = DateNormalizer.parse_manual(&token).unwrap();

            let event = ReminderEvent::plan(&yogurt(), &expiry, madrid()).unwrap();

            prop_assert_eq!(event.trigger_date(), day - Days::new(2));
            prop_assert_eq!(event.trigger().time(), chrono::NaiveTime::MIN);
        }
    }
}
