//! Application layer - orchestration between the domain and the ports.
//!
//! - `ConversationEngine` runs the per-chat state machine
//! - `SessionStore` gives each unit of work exclusive access to its chat
//! - `ProductResolver` / `ReminderScheduler` wrap their collaborators
//!   with deadlines and typed outcomes
//! - `Dispatcher` / `UpdatePoller` feed inbound events to per-chat workers

pub mod dispatcher;
pub mod engine;
pub mod poller;
pub mod product_resolver;
pub mod reminder_scheduler;
pub mod scoped_image;
pub mod session_store;

pub use dispatcher::Dispatcher;
pub use engine::{ConversationEngine, EngineCollaborators, EngineSettings};
pub use poller::{PollerConfig, UpdatePoller};
pub use product_resolver::{ProductLookup, ProductResolver};
pub use reminder_scheduler::{ReminderScheduler, ScheduledReminder, SchedulingError};
pub use scoped_image::ScopedImage;
pub use session_store::{SessionSlot, SessionStore};
