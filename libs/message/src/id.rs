//! Message identifiers
//!
//! Every message gets a fresh identifier at construction. Identifiers double
//! as correlation ids: a result message points back at the message that
//! triggered it through its `correlationId` header.

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Process-unique message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId {
    id: Uuid,
}

impl MessageId {
    /// Generate a new random identifier
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    /// Wrap an existing UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self { id }
    }

    /// Get the underlying UUID
    pub fn uuid(&self) -> Uuid {
        self.id
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id.hyphenated())
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self::from_uuid)
    }
}

impl From<Uuid> for MessageId {
    fn from(id: Uuid) -> Self {
        Self::from_uuid(id)
    }
}
