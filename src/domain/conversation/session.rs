//! Per-chat session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChatId, StateMachine, ValidationError};
use crate::domain::product::Product;

use super::ConversationState;

/// The registration in progress for one chat.
///
/// Created by `/start`, mutated only by the conversation engine, and
/// dropped when the flow completes or is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    chat: ChatId,
    state: ConversationState,
    pending_product: Option<Product>,
}

impl Session {
    /// Starts a fresh flow at the method choice.
    pub fn start(chat: ChatId) -> Self {
        Self {
            chat,
            state: ConversationState::ChoosingMethod,
            pending_product: None,
        }
    }

    pub fn chat(&self) -> ChatId {
        self.chat
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn pending_product(&self) -> Option<&Product> {
        self.pending_product.as_ref()
    }

    /// Moves to `target`, validated against the transition table.
    pub fn advance(&mut self, target: ConversationState) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(target)?;
        Ok(())
    }

    /// Records the product and moves to `target` in one step.
    pub fn advance_with_product(
        &mut self,
        product: Product,
        target: ConversationState,
    ) -> Result<(), ValidationError> {
        self.advance(target)?;
        self.pending_product = Some(product);
        Ok(())
    }
}
