//! Validation errors shared by domain value objects and the state table.

use thiserror::Error;

/// Rejected input or a rejected state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    /// The transition table has no edge from `from` to `to`.
    #[error("Cannot transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },

    /// A step needed the chat's session but none was started.
    #[error("No registration in progress")]
    NoActiveSession,
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    pub fn illegal_transition(from: impl std::fmt::Debug, to: impl std::fmt::Debug) -> Self {
        ValidationError::IllegalTransition {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}
