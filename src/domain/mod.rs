//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, validation errors, state machine, access list)
//! - `product` - Product value object
//! - `expiry` - Expiration date normalization
//! - `reminder` - Reminder event planning
//! - `conversation` - Registration flow states, sessions, events and replies

pub mod conversation;
pub mod expiry;
pub mod foundation;
pub mod product;
pub mod reminder;
