//! Static allow-list of actors permitted to use the bot.
//!
//! Loaded once at process start from configuration and never mutated; a
//! change requires a restart.

use std::collections::HashSet;

use super::ActorId;

/// The set of actors allowed to interact with the workflow.
#[derive(Debug, Clone, Default)]
pub struct AccessList {
    permitted: HashSet<ActorId>,
}

impl AccessList {
    /// Creates an access list from the permitted actor ids.
    pub fn new(permitted: impl IntoIterator<Item = ActorId>) -> Self {
        Self {
            permitted: permitted.into_iter().collect(),
        }
    }

    /// Returns true if the actor may use the bot.
    pub fn permits(&self, actor: ActorId) -> bool {
        self.permitted.contains(&actor)
    }

    pub fn len(&self) -> usize {
        self.permitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permitted.is_empty()
    }
}
