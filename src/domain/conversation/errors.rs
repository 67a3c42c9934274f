//! Workflow error taxonomy.
//!
//! Every failure inside a unit of work ends up as one of these, which
//! decides both the reply the user sees and whether the session survives.

use std::fmt;
use thiserror::Error;

use crate::domain::expiry::DateError;
use crate::domain::foundation::{ActorId, ValidationError};

use super::copy;

/// External systems the workflow depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    Messaging,
    TextRecognition,
    BarcodeDecoder,
    ProductCatalog,
    Calendar,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Collaborator::Messaging => "messaging",
            Collaborator::TextRecognition => "text_recognition",
            Collaborator::BarcodeDecoder => "barcode_decoder",
            Collaborator::ProductCatalog => "product_catalog",
            Collaborator::Calendar => "calendar",
        };
        f.write_str(s)
    }
}

/// Which image the recognizer was looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionStage {
    Barcode,
    ExpirationDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Actor is not on the access list.
    #[error("Actor {actor} is not authorized")]
    AuthorizationDenied { actor: ActorId },

    /// OCR or barcode decoding produced nothing usable.
    #[error("Recognition failed at {stage:?}: {reason}")]
    RecognitionFailure {
        stage: RecognitionStage,
        reason: String,
    },

    /// The catalog has no product for the barcode.
    #[error("No product found for barcode {barcode}")]
    LookupMiss { barcode: String },

    /// Typed date does not match an accepted shape.
    #[error("Invalid date input: {0}")]
    ValidationFailure(DateError),

    /// Accepted date that cannot become a reminder, such as 31/02/2026.
    #[error("Cannot schedule reminder for {date}: {reason}")]
    UnschedulableDate { date: String, reason: String },

    /// Transport or service error from a collaborator.
    #[error("{collaborator} failed: {reason}")]
    CollaboratorFailure {
        collaborator: Collaborator,
        reason: String,
    },

    /// A step tried a transition the state table does not allow.
    #[error("Invalid state transition: {0}")]
    InvalidTransition(#[from] ValidationError),
}

impl WorkflowError {
    pub fn recognition(stage: RecognitionStage, reason: impl Into<String>) -> Self {
        WorkflowError::RecognitionFailure {
            stage,
            reason: reason.into(),
        }
    }

    pub fn collaborator(collaborator: Collaborator, reason: impl ToString) -> Self {
        WorkflowError::CollaboratorFailure {
            collaborator,
            reason: reason.to_string(),
        }
    }

    /// The reply shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::AuthorizationDenied { .. } => copy::REJECTION.to_string(),
            WorkflowError::RecognitionFailure {
                stage: RecognitionStage::Barcode,
                ..
            } => copy::BARCODE_UNREADABLE.to_string(),
            WorkflowError::RecognitionFailure {
                stage: RecognitionStage::ExpirationDate,
                ..
            } => copy::EXPIRATION_UNREADABLE.to_string(),
            WorkflowError::LookupMiss { .. } => copy::BARCODE_UNKNOWN.to_string(),
            WorkflowError::ValidationFailure(_) => copy::INVALID_DATE.to_string(),
            WorkflowError::UnschedulableDate { date, .. } => copy::not_a_calendar_date(date),
            WorkflowError::CollaboratorFailure {
                collaborator: Collaborator::Calendar,
                ..
            } => copy::CALENDAR_FAILED.to_string(),
            WorkflowError::CollaboratorFailure {
                collaborator: Collaborator::Messaging,
                ..
            } => copy::IMAGE_FAILED.to_string(),
            WorkflowError::CollaboratorFailure { .. } | WorkflowError::InvalidTransition(_) => {
                copy::GENERIC_FAILURE.to_string()
            }
        }
    }

    /// True when the error is recovered by a fallback step and the session
    /// lives on; false when the session must be discarded.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WorkflowError::AuthorizationDenied { .. }
                | WorkflowError::RecognitionFailure { .. }
                | WorkflowError::LookupMiss { .. }
                | WorkflowError::ValidationFailure(_)
        )
    }
}
