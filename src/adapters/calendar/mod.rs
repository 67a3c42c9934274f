//! Calendar adapters.

mod google;
mod service_account;

pub use google::{GoogleCalendarClient, GoogleCalendarConfig};
pub use service_account::{ServiceAccountKey, TokenProvider, CALENDAR_SCOPE};
