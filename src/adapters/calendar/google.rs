//! Google Calendar - Implementation of CalendarClient over the v3 API.
//!
//! `POST {api_base_url}/calendars/{calendarId}/events` with a bearer token
//! from the service account. Start and end are sent as RFC 3339 instants
//! together with the IANA timezone name.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{CalendarClient, CalendarError, CalendarEventRequest, CreatedEvent};

use super::service_account::{ServiceAccountKey, TokenProvider, CALENDAR_SCOPE};

/// Configuration for the Google Calendar client.
#[derive(Debug, Clone)]
pub struct GoogleCalendarConfig {
    /// API root (default: https://www.googleapis.com/calendar/v3).
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for GoogleCalendarConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Google Calendar event creator.
pub struct GoogleCalendarClient {
    config: GoogleCalendarConfig,
    base_url: Url,
    client: Client,
    tokens: TokenProvider,
}

impl GoogleCalendarClient {
    pub fn new(config: GoogleCalendarConfig, key: ServiceAccountKey) -> Result<Self, CalendarError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CalendarError::Network(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            CalendarError::Parse(format!("Invalid calendar API URL {}: {}", config.api_base_url, e))
        })?;

        Ok(Self {
            tokens: TokenProvider::new(key, CALENDAR_SCOPE, client.clone()),
            config,
            base_url,
            client,
        })
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn create_event(
        &self,
        request: CalendarEventRequest,
    ) -> Result<CreatedEvent, CalendarError> {
        let url = events_url(&self.base_url, &request.calendar_id)?;
        let token = self.tokens.access_token().await?;
        let body = EventBody::from(&request);

        let response = self
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CalendarError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    CalendarError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejection(status, body));
        }

        let created: EventResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::Parse(format!("Invalid event response: {}", e)))?;

        Ok(CreatedEvent {
            id: created.id,
            html_link: created.html_link,
        })
    }
}

/// Events collection URL. The calendar id is percent-encoded as one segment.
fn events_url(base: &Url, calendar_id: &str) -> Result<Url, CalendarError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| CalendarError::Parse("Calendar API URL cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(["calendars", calendar_id, "events"]);
    Ok(url)
}

fn rejection(status: StatusCode, body: String) -> CalendarError {
    match status {
        StatusCode::UNAUTHORIZED => {
            CalendarError::Authentication(format!("Calendar rejected token: {}", body))
        }
        _ => CalendarError::Rejected {
            status: status.as_u16(),
            body,
        },
    }
}

#[derive(Debug, Serialize)]
struct EventBody<'a> {
    summary: &'a str,
    start: EventTime<'a>,
    end: EventTime<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

impl<'a> From<&'a CalendarEventRequest> for EventBody<'a> {
    fn from(request: &'a CalendarEventRequest) -> Self {
        Self {
            summary: &request.title,
            start: EventTime {
                date_time: request.start.to_rfc3339(),
                time_zone: &request.timezone,
            },
            end: EventTime {
                date_time: request.end.to_rfc3339(),
                time_zone: &request.timezone,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventResponse {
    id: String,
    #[serde(default)]
    html_link: Option<String>,
}
