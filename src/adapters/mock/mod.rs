//! Mock adapters for testing.
//!
//! In-memory implementations of every port, so the registration flow can
//! be driven end to end without network access or external binaries.
//!
//! # Features
//!
//! - Queued responses, consumed in order
//! - Simulated delays for timeout and concurrency testing
//! - Error injection
//! - Call recording for verification

mod calendar;
mod catalog;
mod messaging;
mod recognition;

pub use calendar::MockCalendar;
pub use catalog::MockProductCatalog;
pub use messaging::{MockMessaging, MockUpdateSource, SentMessage};
pub use recognition::{MockBarcodeDecoder, MockTextRecognizer, SeenImage};
