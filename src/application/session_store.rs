//! Session store with per-chat exclusive access.
//!
//! Sessions live in a sharded map of chat id → mutex-guarded slot.
//! Acquiring a slot locks that chat only; other chats proceed in
//! parallel. A slot is held for the whole unit of work, external calls
//! included, so overlapping events for one chat apply strictly one after
//! the other.
//!
//! Empty slots are pruned when released, but only if nobody else is
//! holding or waiting on them.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::conversation::{ConversationState, Session};
use crate::domain::foundation::{ChatId, ValidationError};
use crate::domain::product::Product;

type Slot = Arc<Mutex<Option<Session>>>;

/// In-memory session store. Cloning shares the same sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    slots: Arc<DashMap<ChatId, Slot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the chat's slot, waiting for any unit of work already holding it.
    pub async fn acquire(&self, chat: ChatId) -> SessionSlot {
        // The map guard must be gone before awaiting the slot lock.
        let slot = self.slots.entry(chat).or_default().clone();
        let guard = slot.lock_owned().await;
        SessionSlot {
            chat,
            guard,
            slots: Arc::clone(&self.slots),
        }
    }

    /// Copy of the chat's session, waiting for in-flight work to finish.
    pub async fn snapshot(&self, chat: ChatId) -> Option<Session> {
        self.acquire(chat).await.session().cloned()
    }

    /// Number of chats with a slot in the map (active or in use).
    pub fn tracked_chats(&self) -> usize {
        self.slots.len()
    }
}

/// Exclusive access to one chat's session for the duration of a unit of work.
///
/// `None` inside the slot is the idle state.
#[derive(Debug)]
pub struct SessionSlot {
    chat: ChatId,
    guard: OwnedMutexGuard<Option<Session>>,
    slots: Arc<DashMap<ChatId, Slot>>,
}

impl SessionSlot {
    pub fn chat(&self) -> ChatId {
        self.chat
    }

    pub fn session(&self) -> Option<&Session> {
        self.guard.as_ref()
    }

    /// Current state; `Idle` when no session exists.
    pub fn state(&self) -> ConversationState {
        self.guard
            .as_ref()
            .map(Session::state)
            .unwrap_or(ConversationState::Idle)
    }

    pub fn pending_product(&self) -> Option<&Product> {
        self.guard.as_ref().and_then(Session::pending_product)
    }

    /// Replaces whatever was in flight with `session`.
    pub fn replace(&mut self, session: Session) {
        *self.guard = Some(session);
    }

    /// Discards the session, returning the chat to idle.
    pub fn clear(&mut self) {
        *self.guard = None;
    }

    /// Moves the session to `target` via the transition table.
    pub fn advance(&mut self, target: ConversationState) -> Result<(), ValidationError> {
        self.session_mut()?.advance(target)
    }

    /// Stores the product and moves to `target`.
    pub fn advance_with_product(
        &mut self,
        product: Product,
        target: ConversationState,
    ) -> Result<(), ValidationError> {
        self.session_mut()?.advance_with_product(product, target)
    }

    /// Validates that completing is allowed from here, then clears.
    pub fn complete(&mut self) -> Result<(), ValidationError> {
        self.advance(ConversationState::Idle)?;
        self.clear();
        Ok(())
    }

    fn session_mut(&mut self) -> Result<&mut Session, ValidationError> {
        self.guard
            .as_mut()
            .ok_or(ValidationError::NoActiveSession)
    }
}

impl Drop for SessionSlot {
    fn drop(&mut self) {
        if self.guard.is_none() {
            // Two references: the map's and this guard's. Any more means a
            // waiter already cloned the slot, so it must stay.
            self.slots
                .remove_if(&self.chat, |_, slot| Arc::strong_count(slot) == 2);
        }
    }
}
