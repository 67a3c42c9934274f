//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the registration flow and the collaborators it relies on. Adapters
//! implement these ports.
//!
//! - `MessagingGateway` / `UpdateSource` - chat transport
//! - `TextRecognizer` - OCR of expiration date photos
//! - `BarcodeDecoder` - barcode photos to payload strings
//! - `ProductCatalog` - product metadata by barcode
//! - `CalendarClient` - reminder event creation

mod barcode_decoder;
mod calendar;
mod messaging;
mod product_catalog;
mod text_recognizer;

pub use barcode_decoder::{BarcodeDecoder, BarcodeError};
pub use calendar::{CalendarClient, CalendarError, CalendarEventRequest, CreatedEvent};
pub use messaging::{MessagingError, MessagingGateway, UpdateSource};
pub use product_catalog::{CatalogError, ProductCatalog};
pub use text_recognizer::{RecognitionError, RecognitionOptions, TextRecognizer};
