//! Calendar configuration

use chrono_tz::Tz;
use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use super::is_http_url;

/// Google Calendar configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarSettings {
    /// Target calendar identifier
    pub calendar_id: String,

    /// IANA timezone reminders are anchored to
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Service-account key file
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl CalendarSettings {
    /// Parsed timezone. Call after [`validate`](Self::validate).
    pub fn tz(&self) -> Result<Tz, ValidationError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ValidationError::InvalidTimezone(self.timezone.clone()))
    }

    /// Validate calendar configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.calendar_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("calendar.calendar_id"));
        }
        self.tz()?;
        if !is_http_url(&self.api_base_url) {
            return Err(ValidationError::InvalidUrl("calendar.api_base_url"));
        }
        Ok(())
    }
}

fn default_timezone() -> String {
    "Europe/Madrid".to_string()
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("./config/google-credentials.json")
}

fn default_api_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}
