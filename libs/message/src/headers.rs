//! Immutable header set
//!
//! Headers are an ordered list of unique, case-sensitive keys. The list is
//! shared behind an `Arc`; every "modification" produces a new header set and
//! leaves the original untouched, so messages can be handed across tasks
//! without synchronization.
//!
//! The `id` entry is always present and always first.

use crate::{FromValue, MessageError, MessageId, Value};
use std::fmt;
use std::sync::Arc;

/// Reserved header keys
pub mod keys {
    pub const ID: &str = "id";
    pub const CORRELATION_ID: &str = "correlationId";
    pub const SEQUENCE_NUMBER: &str = "sequenceNumber";
    pub const SEQUENCE_SIZE: &str = "sequenceSize";

    /// Keys owned by the framework
    pub const RESERVED: [&str; 4] = [ID, CORRELATION_ID, SEQUENCE_NUMBER, SEQUENCE_SIZE];

    pub fn is_reserved(key: &str) -> bool {
        RESERVED.contains(&key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageHeaders {
    id: MessageId,
    entries: Arc<Vec<(String, Value)>>,
}

impl MessageHeaders {
    /// Assemble a header set. `entries` must not contain the `id` key.
    pub(crate) fn from_parts(id: MessageId, entries: Vec<(String, Value)>) -> Self {
        let mut all = Vec::with_capacity(entries.len() + 1);
        all.push((keys::ID.to_string(), Value::Id(id)));
        all.extend(entries.into_iter().filter(|(k, _)| k != keys::ID));
        Self {
            id,
            entries: Arc::new(all),
        }
    }

    /// Copy of this header set with one entry added or replaced
    pub(crate) fn overlay(&self, key: &str, value: Value) -> Self {
        debug_assert_ne!(key, keys::ID);
        let mut entries = (*self.entries).clone();
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key.to_string(), value)),
        }
        Self {
            id: self.id,
            entries: Arc::new(entries),
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Read a header as a specific type. A missing header is `Ok(None)`,
    /// a header of another shape is a `TypeMismatch`.
    pub fn get_as<T: FromValue>(&self, key: &str) -> Result<Option<T>, MessageError> {
        self.get(key).map(T::from_value).transpose()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn correlation_id(&self) -> Option<MessageId> {
        self.get(keys::CORRELATION_ID).and_then(Value::as_id)
    }

    /// 1-based position within a produced group
    pub fn sequence_number(&self) -> Option<u32> {
        self.positive_integer(keys::SEQUENCE_NUMBER)
    }

    /// Total count of the group; 0 or absent means unknown
    pub fn sequence_size(&self) -> Option<u32> {
        self.positive_integer(keys::SEQUENCE_SIZE)
    }

    fn positive_integer(&self, key: &str) -> Option<u32> {
        self.get(key)
            .and_then(Value::as_integer)
            .and_then(|i| u32::try_from(i).ok())
            .filter(|n| *n > 0)
    }

    /// Number of entries, including `id`
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: `id` is always present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, `id` first
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries other than `id`, as owned pairs ready to feed a builder
    pub fn user_entries(&self) -> Vec<(String, Value)> {
        self.entries
            .iter()
            .filter(|(k, _)| k != keys::ID)
            .cloned()
            .collect()
    }
}

impl fmt::Display for MessageHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        write!(f, "}}")
    }
}
