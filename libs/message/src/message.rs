use crate::headers::keys;
use crate::{MessageHeaders, MessageId, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Immutable message envelope
///
/// Cloning is cheap: payload and headers are reference counted. Two messages
/// are equal iff they carry the same id.
pub struct Message<T> {
    headers: MessageHeaders,
    payload: Arc<T>,
}

impl<T> Message<T> {
    /// Create a message with a fresh id and no extra headers
    pub fn new(payload: T) -> Self {
        Self::from_parts(Arc::new(payload), MessageHeaders::from_parts(MessageId::new(), Vec::new()))
    }

    pub(crate) fn from_parts(payload: Arc<T>, headers: MessageHeaders) -> Self {
        Self { headers, payload }
    }

    pub fn id(&self) -> MessageId {
        self.headers.id()
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Shared handle to the payload, for building derived messages without copying
    pub fn shared_payload(&self) -> Arc<T> {
        Arc::clone(&self.payload)
    }

    pub fn headers(&self) -> &MessageHeaders {
        &self.headers
    }

    /// New message with the same id and payload and one header added or replaced
    ///
    /// The `id` header belongs to the framework; attempts to replace it are ignored.
    pub fn with_header(&self, key: impl AsRef<str>, value: impl Into<Value>) -> Self {
        let key = key.as_ref();
        if key == keys::ID {
            tracing::warn!("Ignoring attempt to overwrite 'id' header of message {}", self.id());
            return self.clone();
        }
        Self {
            headers: self.headers.overlay(key, value.into()),
            payload: Arc::clone(&self.payload),
        }
    }

    /// Take the payload out, cloning it only if other messages still share it
    pub fn into_payload(self) -> T
    where
        T: Clone,
    {
        Arc::try_unwrap(self.payload).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl<T> Clone for Message<T> {
    fn clone(&self) -> Self {
        Self {
            headers: self.headers.clone(),
            payload: Arc::clone(&self.payload),
        }
    }
}

impl<T> PartialEq for Message<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<T> Eq for Message<T> {}

impl<T> Hash for Message<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Message<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("payload", &self.payload)
            .field("headers", &self.headers)
            .finish()
    }
}

impl<T: fmt::Debug> fmt::Display for Message<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Payload={:?}][Headers={}]", self.payload, self.headers)
    }
}
