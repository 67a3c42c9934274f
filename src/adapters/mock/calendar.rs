//! Mock calendar backend.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{CalendarClient, CalendarError, CalendarEventRequest, CreatedEvent};

/// Records event requests and confirms them with sequential ids.
#[derive(Debug, Clone, Default)]
pub struct MockCalendar {
    requests: Arc<Mutex<Vec<CalendarEventRequest>>>,
    error: Option<CalendarError>,
    delay: Duration,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails with `error`. Requests are still recorded.
    pub fn failing(mut self, error: CalendarError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<CalendarEventRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarClient for MockCalendar {
    async fn create_event(
        &self,
        request: CalendarEventRequest,
    ) -> Result<CreatedEvent, CalendarError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let number = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(CreatedEvent {
            id: format!("evt-{}", number),
            html_link: Some(format!("https://calendar.test/event/evt-{}", number)),
        })
    }
}
