//! Foundation module - Shared domain primitives.
//!
//! Identifiers, the validation error type, the state machine trait and
//! the static access list.

mod access;
mod errors;
mod ids;
mod state_machine;

pub use access::AccessList;
pub use errors::ValidationError;
pub use ids::{ActorId, ChatId};
pub use state_machine::StateMachine;
