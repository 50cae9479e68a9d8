//! Message builder
//!
//! The builder is the only way to assemble a message with an arbitrary header
//! set. It copies whatever it is given, so the source of the headers (another
//! message, a mapper) is never affected by later changes.

use crate::headers::keys;
use crate::{Message, MessageError, MessageHeaders, MessageId, Value};
use std::sync::Arc;

#[derive(Debug)]
pub struct MessageBuilder<T> {
    payload: Option<Arc<T>>,
    entries: Vec<(String, Value)>,
}

impl<T> Default for MessageBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MessageBuilder<T> {
    /// Empty builder; a payload must be supplied before `build`
    pub fn new() -> Self {
        Self {
            payload: None,
            entries: Vec::new(),
        }
    }

    pub fn with_payload(payload: T) -> Self {
        Self::with_shared_payload(Arc::new(payload))
    }

    pub fn with_shared_payload(payload: Arc<T>) -> Self {
        Self {
            payload: Some(payload),
            entries: Vec::new(),
        }
    }

    /// Start from an existing message's payload and headers.
    /// The built message gets a new id.
    pub fn from_message(message: &Message<T>) -> Self {
        Self {
            payload: Some(message.shared_payload()),
            entries: message.headers().user_entries(),
        }
    }

    pub fn payload(mut self, payload: T) -> Self {
        self.payload = Some(Arc::new(payload));
        self
    }

    /// Look at a header that is about to be built
    pub fn header(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Add or replace a header
    pub fn set_header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.upsert(key.into(), value.into(), true);
        self
    }

    /// Add a header only if the key is not present yet
    pub fn set_header_if_absent(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.upsert(key.into(), value.into(), false);
        self
    }

    pub fn remove_header(mut self, key: &str) -> Self {
        self.entries.retain(|(k, _)| k != key);
        self
    }

    /// Overlay every supplied entry, reserved keys included (except `id`)
    pub fn copy_headers<K, V, I>(mut self, headers: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in headers {
            self.upsert(k.into(), v.into(), true);
        }
        self
    }

    /// Copy only the entries whose key is not present yet
    pub fn copy_headers_if_absent<K, V, I>(mut self, headers: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in headers {
            self.upsert(k.into(), v.into(), false);
        }
        self
    }

    pub fn correlation_id(self, id: MessageId) -> Self {
        self.set_header(keys::CORRELATION_ID, id)
    }

    pub fn sequence_number(self, number: u32) -> Self {
        self.set_header(keys::SEQUENCE_NUMBER, number)
    }

    pub fn sequence_size(self, size: u32) -> Self {
        self.set_header(keys::SEQUENCE_SIZE, size)
    }

    /// Build the message, assigning a fresh id
    pub fn build(self) -> Result<Message<T>, MessageError> {
        let payload = self
            .payload
            .ok_or_else(|| MessageError::invalid_argument("'payload' must not be absent"))?;
        let headers = MessageHeaders::from_parts(MessageId::new(), self.entries);
        Ok(Message::from_parts(payload, headers))
    }

    fn upsert(&mut self, key: String, value: Value, replace: bool) {
        if key == keys::ID {
            tracing::warn!("Ignoring 'id' header supplied to builder; ids are assigned on build");
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) if replace => entry.1 = value,
            Some(_) => {}
            None => self.entries.push((key, value)),
        }
    }
}
