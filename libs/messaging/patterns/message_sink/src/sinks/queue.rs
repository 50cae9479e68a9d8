//! Bounded in-process queue
//!
//! `QueueSink` is the producing half of a bounded `tokio::sync::mpsc` channel.
//! When the queue is full, `send` suspends until the consumer makes room, so
//! upstream endpoints inherit the consumer's pace instead of buffering.

use crate::{MessageSink, SendContext, SinkError, SinkMetadata};
use async_trait::async_trait;
use message::Message;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Producing half of a bounded message queue
pub struct QueueSink<T> {
    sender: mpsc::Sender<Message<T>>,
    capacity: usize,
    send_timeout: Option<Duration>,
    name: String,
    messages_sent: AtomicU64,
    messages_failed: AtomicU64,
}

/// Consuming half of a bounded message queue
#[derive(Debug)]
pub struct QueueReceiver<T> {
    receiver: mpsc::Receiver<Message<T>>,
}

impl<T: Send + Sync + 'static> QueueSink<T> {
    /// Create a queue holding at most `capacity` undelivered messages
    pub fn bounded(capacity: usize) -> Result<(Self, QueueReceiver<T>), SinkError> {
        if capacity == 0 {
            return Err(SinkError::invalid_config("Queue capacity must be greater than 0"));
        }
        let (sender, receiver) = mpsc::channel(capacity);
        let sink = Self {
            sender,
            capacity,
            send_timeout: None,
            name: "queue".to_string(),
            messages_sent: AtomicU64::new(0),
            messages_failed: AtomicU64::new(0),
        };
        Ok((sink, QueueReceiver { receiver }))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Give up waiting for room after `timeout` instead of blocking indefinitely
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = Some(timeout);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots right now
    pub fn available(&self) -> usize {
        self.sender.capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn record(&self, result: &Result<(), SinkError>) {
        match result {
            Ok(()) => self.messages_sent.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.messages_failed.fetch_add(1, Ordering::Relaxed),
        };
    }
}

impl<T> fmt::Debug for QueueSink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueSink")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("send_timeout", &self.send_timeout)
            .finish()
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> MessageSink<T> for QueueSink<T> {
    async fn send(&self, message: Message<T>) -> Result<(), SinkError> {
        let result = match self.send_timeout {
            None => self.sender.send(message).await.map_err(|_| SinkError::Closed),
            Some(timeout) => {
                let context = SendContext::for_message(&message).with_target(self.name.clone());
                match tokio::time::timeout(timeout, self.sender.send(message)).await {
                    Ok(sent) => sent.map_err(|_| SinkError::Closed),
                    Err(_) => {
                        tracing::warn!(
                            "Queue '{}' still full after {:?}, rejecting message {:?}",
                            self.name,
                            timeout,
                            context.message_id
                        );
                        Err(SinkError::timeout(timeout.as_millis() as u64))
                    }
                }
            }
        };
        self.record(&result);
        result
    }

    fn metadata(&self) -> SinkMetadata {
        SinkMetadata::new(self.name.clone(), "queue").with_counts(
            self.messages_sent.load(Ordering::Relaxed),
            self.messages_failed.load(Ordering::Relaxed),
        )
    }
}

impl<T> QueueReceiver<T> {
    /// Wait for the next message; `None` once every sender is gone and the queue is empty
    pub async fn recv(&mut self) -> Option<Message<T>> {
        self.receiver.recv().await
    }

    /// Wait at most `timeout` for the next message
    pub async fn recv_timeout(&mut self, timeout: Duration) -> Option<Message<T>> {
        tokio::time::timeout(timeout, self.receiver.recv())
            .await
            .ok()
            .flatten()
    }

    /// Take the next message if one is ready
    pub fn try_recv(&mut self) -> Option<Message<T>> {
        self.receiver.try_recv().ok()
    }

    /// Take every message that is ready, in arrival order
    pub fn drain(&mut self) -> Vec<Message<T>> {
        let mut messages = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            messages.push(message);
        }
        messages
    }

    /// Stop accepting new messages; already queued ones can still be drained
    pub fn close(&mut self) {
        self.receiver.close();
    }
}
