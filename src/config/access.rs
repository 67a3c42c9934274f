//! Access configuration

use serde::Deserialize;

use crate::domain::foundation::{AccessList, ActorId};

use super::error::ValidationError;

/// Who may use the bot
#[derive(Debug, Clone, Deserialize)]
pub struct AccessSettings {
    /// Comma-separated numeric actor ids
    pub authorized_users: String,
}

impl AccessSettings {
    /// Parses the configured ids.
    pub fn actor_ids(&self) -> Result<Vec<ActorId>, ValidationError> {
        self.authorized_users
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<ActorId>()
                    .map_err(|_| ValidationError::InvalidActorId(s.to_string()))
            })
            .collect()
    }

    /// Builds the access list loaded once at startup.
    pub fn access_list(&self) -> Result<AccessList, ValidationError> {
        Ok(AccessList::new(self.actor_ids()?))
    }

    /// Validate access configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.actor_ids()?.is_empty() {
            return Err(ValidationError::EmptyAccessList);
        }
        Ok(())
    }
}
