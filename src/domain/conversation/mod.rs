//! Conversation domain module.
//!
//! The registration flow as pure types: the closed state enumeration and
//! its transition table, the per-chat session, inbound events, outbound
//! replies and the error taxonomy that maps failures to replies.

pub mod copy;
mod errors;
mod inbound;
mod outbound;
mod session;
mod state;

pub use errors::{Collaborator, RecognitionStage, WorkflowError};
pub use inbound::{EventKind, ImageRef, InboundEvent, MethodChoice};
pub use outbound::{Button, Keyboard, OutboundMessage};
pub use session::Session;
pub use state::ConversationState;
