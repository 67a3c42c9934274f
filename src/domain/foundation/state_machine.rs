//! Transition-table trait for closed state enumerations.
//!
//! A state enum lists its legal edges once; callers change state only
//! through [`StateMachine::transition_to`], which refuses any edge the
//! table does not contain.

use super::ValidationError;

/// A closed set of states plus the edges allowed between them.
///
/// ```ignore
/// impl StateMachine for ConversationState {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Idle, ChoosingMethod) | /* ... */)
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Idle => vec![ChoosingMethod],
///             // ...
///         }
///     }
/// }
///
/// session.state = session.state.transition_to(ConversationState::ChoosingMethod)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Whether the table has an edge from `self` to `target`.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every state reachable in one step. Must agree with
    /// [`can_transition_to`](Self::can_transition_to).
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns `target` when the edge exists.
    ///
    /// # Errors
    ///
    /// `ValidationError::IllegalTransition` naming both states otherwise.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::illegal_transition(self, target));
        }
        Ok(target)
    }

    /// No outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
