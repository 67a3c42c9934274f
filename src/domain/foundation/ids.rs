//! Strongly-typed identifier value objects.
//!
//! Chat and actor identifiers come from the messaging collaborator as
//! signed 64-bit integers. Wrapping them keeps a chat id from being passed
//! where an actor id is expected (they coincide in private chats but not
//! in groups).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one conversation; sessions are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(i64);

impl ChatId {
    /// Creates a ChatId from the raw transport value.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw transport value.
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChatId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Identifies the person who produced an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(i64);

impl ActorId {
    /// Creates an ActorId from the raw transport value.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw transport value.
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ActorId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl FromStr for ActorId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}
