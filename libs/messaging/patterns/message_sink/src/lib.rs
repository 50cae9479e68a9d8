//! # Message sinks
//!
//! Destinations that endpoints dispatch messages to. A sink either accepts a
//! message or rejects it with a [`SinkError`]; delivery mechanics beyond that
//! (queueing, direct hand-off) belong to the concrete sink.

pub mod batch;
pub mod error;
pub mod metadata;
pub mod sinks;
pub mod test_utils;

use async_trait::async_trait;
use message::Message;
use std::fmt::Debug;
use std::time::{SystemTime, UNIX_EPOCH};

pub use batch::BatchResult;
pub use error::{SendContext, SinkError};
pub use metadata::SinkMetadata;
pub use sinks::{DirectSink, QueueReceiver, QueueSink};

/// A destination for messages
#[async_trait]
pub trait MessageSink<T: Send + Sync + 'static>: Send + Sync + Debug {
    /// Deliver a single message
    async fn send(&self, message: Message<T>) -> Result<(), SinkError>;

    /// Deliver several messages in order, returning partial results
    async fn send_batch(&self, messages: Vec<Message<T>>) -> Result<BatchResult, SinkError> {
        let mut result = BatchResult::new(messages.len());

        for (index, message) in messages.into_iter().enumerate() {
            match self.send(message).await {
                Ok(()) => result.record_success(),
                Err(e) => result.record_failure(index, e),
            }
        }

        Ok(result)
    }

    /// Get sink metadata for debugging/monitoring
    fn metadata(&self) -> SinkMetadata {
        SinkMetadata::default()
    }
}

/// Wall-clock time in nanoseconds since the Unix epoch, 0 if the clock is before it
pub fn current_timestamp_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
