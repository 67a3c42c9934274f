//! Conversation state machine.
//!
//! Defines the steps of the product registration flow and the valid
//! transitions between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where a chat currently is in the registration flow.
///
/// Two entry paths share the tail of the flow:
/// - manual: `ChoosingMethod` → `AwaitingNameManual` → `AwaitingDateManual`
/// - photos: `ChoosingMethod` → `AwaitingBarcodeImage` →
///   `AwaitingExpirationImage`, dropping back to the manual steps whenever
///   recognition comes up empty.
///
/// `Idle` is what an absent session means; a completed or abandoned flow
/// returns there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// No registration in progress.
    #[default]
    Idle,

    /// Method-choice buttons shown, waiting for a press.
    ChoosingMethod,

    /// Waiting for the product name as text.
    AwaitingNameManual,

    /// Waiting for a photo of the barcode.
    AwaitingBarcodeImage,

    /// Waiting for a photo of the printed expiration date.
    AwaitingExpirationImage,

    /// Waiting for the expiration date as text.
    AwaitingDateManual,
}

impl ConversationState {
    /// Returns true if free text is consumed in this state.
    pub fn accepts_text(&self) -> bool {
        matches!(self, Self::AwaitingNameManual | Self::AwaitingDateManual)
    }

    /// Returns true if an uploaded image is consumed in this state.
    pub fn accepts_image(&self) -> bool {
        matches!(
            self,
            Self::AwaitingBarcodeImage | Self::AwaitingExpirationImage
        )
    }

    /// Returns true if a method-choice button press is consumed.
    pub fn accepts_choice(&self) -> bool {
        matches!(self, Self::ChoosingMethod)
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::ChoosingMethod => "choosing_method",
            Self::AwaitingNameManual => "awaiting_name_manual",
            Self::AwaitingBarcodeImage => "awaiting_barcode_image",
            Self::AwaitingExpirationImage => "awaiting_expiration_image",
            Self::AwaitingDateManual => "awaiting_date_manual",
        };
        f.write_str(s)
    }
}

impl StateMachine for ConversationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationState::*;
        matches!(
            (self, target),
            // `/start` abandons whatever was in flight
            (_, ChoosingMethod) |
            (ChoosingMethod, AwaitingNameManual) |
            (ChoosingMethod, AwaitingBarcodeImage) |
            (AwaitingNameManual, AwaitingDateManual) |
            (AwaitingBarcodeImage, AwaitingExpirationImage) |
            // unreadable barcode or unknown product
            (AwaitingBarcodeImage, AwaitingNameManual) |
            // unreadable expiration date
            (AwaitingExpirationImage, AwaitingDateManual) |
            // invalid typed date re-prompts
            (AwaitingDateManual, AwaitingDateManual) |
            // reminder scheduled, or a collaborator failed
            (AwaitingBarcodeImage, Idle) |
            (AwaitingExpirationImage, Idle) |
            (AwaitingDateManual, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationState::*;
        match self {
            Idle => vec![ChoosingMethod],
            ChoosingMethod => vec![ChoosingMethod, AwaitingNameManual, AwaitingBarcodeImage],
            AwaitingNameManual => vec![ChoosingMethod, AwaitingDateManual],
            AwaitingBarcodeImage => vec![
                ChoosingMethod,
                AwaitingExpirationImage,
                AwaitingNameManual,
                Idle,
            ],
            AwaitingExpirationImage => vec![ChoosingMethod, AwaitingDateManual, Idle],
            AwaitingDateManual => vec![ChoosingMethod, AwaitingDateManual, Idle],
        }
    }
}
