//! Calendar Port - Interface for creating reminder events.

use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;

/// An event creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEventRequest {
    /// Target calendar identifier.
    pub calendar_id: String,
    /// Event title.
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// IANA timezone name the event is anchored to.
    pub timezone: String,
}

/// Confirmation of a created event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    /// Calendar-assigned event id.
    pub id: String,
    /// Human-viewable link, when the backend provides one.
    pub html_link: Option<String>,
}

/// Port for creating calendar events.
#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn create_event(
        &self,
        request: CalendarEventRequest,
    ) -> Result<CreatedEvent, CalendarError>;
}

/// Calendar errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CalendarError {
    /// Could not obtain credentials for the calendar.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Calendar rejected the request.
    #[error("rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Failed to parse calendar response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl CalendarError {
    /// Returns true if a later attempt might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CalendarError::Network(_) | CalendarError::Timeout { .. } => true,
            CalendarError::Rejected { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            CalendarError::Authentication(_) | CalendarError::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = CalendarError::Rejected {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn client_errors_are_permanent() {
        let err = CalendarError::Rejected {
            status: 404,
            body: "calendar not found".to_string(),
        };
        assert!(!err.is_transient());
        assert!(!CalendarError::Authentication("bad key".to_string()).is_transient());
    }
}
