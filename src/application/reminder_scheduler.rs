//! ReminderScheduler - plans a reminder and submits it to the calendar.

use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::domain::expiry::ExpirationDate;
use crate::domain::product::Product;
use crate::domain::reminder::{ReminderError, ReminderEvent};
use crate::ports::{CalendarClient, CalendarError, CalendarEventRequest, CreatedEvent};

/// A reminder that the calendar accepted.
#[derive(Debug, Clone)]
pub struct ScheduledReminder {
    pub event: ReminderEvent,
    pub created: CreatedEvent,
}

#[derive(Debug, Clone, Error)]
pub enum SchedulingError {
    /// The date could not be turned into a reminder instant.
    #[error(transparent)]
    Planning(#[from] ReminderError),

    /// The calendar refused or could not be reached. Not retried.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Creates one calendar event per call.
pub struct ReminderScheduler {
    calendar: Arc<dyn CalendarClient>,
    calendar_id: String,
    timezone: Tz,
    timeout: Duration,
}

impl ReminderScheduler {
    pub fn new(
        calendar: Arc<dyn CalendarClient>,
        calendar_id: impl Into<String>,
        timezone: Tz,
        timeout: Duration,
    ) -> Self {
        Self {
            calendar,
            calendar_id: calendar_id.into(),
            timezone,
            timeout,
        }
    }

    /// Plans the reminder for `product` and creates it in the calendar.
    ///
    /// Planning errors are returned before the calendar is contacted.
    pub async fn schedule(
        &self,
        product: &Product,
        expiry: &ExpirationDate,
    ) -> Result<ScheduledReminder, SchedulingError> {
        let event = ReminderEvent::plan(product, expiry, self.timezone)?;

        let request = CalendarEventRequest {
            calendar_id: self.calendar_id.clone(),
            title: event.title().to_string(),
            start: event.start(),
            end: event.end(),
            timezone: self.timezone.name().to_string(),
        };

        let created = tokio::time::timeout(self.timeout, self.calendar.create_event(request))
            .await
            .map_err(|_| CalendarError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })??;

        tracing::info!(
            event_id = %created.id,
            link = created.html_link.as_deref().unwrap_or("-"),
            trigger = %event.trigger().to_rfc3339(),
            "Reminder created"
        );

        Ok(ScheduledReminder { event, created })
    }
}
