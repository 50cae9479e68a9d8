//! Direct in-process delivery
//!
//! `DirectSink` hands each message straight to a handler on the caller's task.
//! The handler's verdict is the send result, so a rejecting handler surfaces
//! as a `SinkError` at the dispatching endpoint.

use crate::{MessageSink, SinkError, SinkMetadata};
use async_trait::async_trait;
use message::Message;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sink that invokes a handler synchronously for every message
pub struct DirectSink<T, F>
where
    F: Fn(Message<T>) -> Result<(), SinkError>,
{
    handler: F,
    name: String,
    messages_sent: AtomicU64,
    messages_failed: AtomicU64,
    _payload: std::marker::PhantomData<fn(Message<T>)>,
}

impl<T, F> DirectSink<T, F>
where
    F: Fn(Message<T>) -> Result<(), SinkError>,
{
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            name: "direct".to_string(),
            messages_sent: AtomicU64::new(0),
            messages_failed: AtomicU64::new(0),
            _payload: std::marker::PhantomData,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<T, F> fmt::Debug for DirectSink<T, F>
where
    F: Fn(Message<T>) -> Result<(), SinkError>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectSink")
            .field("name", &self.name)
            .field("messages_sent", &self.messages_sent.load(Ordering::Relaxed))
            .finish()
    }
}

#[async_trait]
impl<T, F> MessageSink<T> for DirectSink<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(Message<T>) -> Result<(), SinkError> + Send + Sync,
{
    async fn send(&self, message: Message<T>) -> Result<(), SinkError> {
        let result = (self.handler)(message);
        match &result {
            Ok(()) => {
                self.messages_sent.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.messages_failed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Direct sink '{}' rejected message: {}", self.name, e);
            }
        }
        result
    }

    fn metadata(&self) -> SinkMetadata {
        SinkMetadata::new(self.name.clone(), "direct").with_counts(
            self.messages_sent.load(Ordering::Relaxed),
            self.messages_failed.load(Ordering::Relaxed),
        )
    }
}
