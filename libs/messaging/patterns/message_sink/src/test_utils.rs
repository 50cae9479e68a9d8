use crate::{MessageSink, SendContext, SinkError, SinkMetadata};
use async_trait::async_trait;
use message::Message;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

/// A sink that just collects messages for testing
#[derive(Debug)]
pub struct CollectorSink<T> {
    messages: Mutex<Vec<Message<T>>>,
    fail_on_send: AtomicBool,
    /// 1-based attempt number that should be rejected, 0 = none
    fail_at_attempt: AtomicUsize,
    attempts: AtomicUsize,
    messages_sent: AtomicU64,
    messages_failed: AtomicU64,
    name: String,
}

impl<T> CollectorSink<T> {
    pub fn new() -> Self {
        Self::with_name("test-collector")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail_on_send: AtomicBool::new(false),
            fail_at_attempt: AtomicUsize::new(0),
            attempts: AtomicUsize::new(0),
            messages_sent: AtomicU64::new(0),
            messages_failed: AtomicU64::new(0),
            name: name.into(),
        }
    }

    /// Get all received messages, in delivery order
    pub fn received_messages(&self) -> Vec<Message<T>> {
        self.messages.lock().clone()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().len()
    }

    /// Remove and return everything received so far
    pub fn take_messages(&self) -> Vec<Message<T>> {
        std::mem::take(&mut *self.messages.lock())
    }

    /// Number of send calls, including rejected ones
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Configure to fail on next send
    pub fn fail_next_send(&self) {
        self.fail_on_send.store(true, Ordering::Relaxed);
    }

    /// Reject the `attempt`-th send call (1-based, counted from creation)
    pub fn fail_on_attempt(&self, attempt: usize) {
        self.fail_at_attempt.store(attempt, Ordering::Relaxed);
    }
}

impl<T: Clone> CollectorSink<T> {
    /// Payloads of received messages, in delivery order
    pub fn payloads(&self) -> Vec<T> {
        self.messages
            .lock()
            .iter()
            .map(|m| m.payload().clone())
            .collect()
    }
}

impl<T> Default for CollectorSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Send + Sync + std::fmt::Debug + 'static> MessageSink<T> for CollectorSink<T> {
    async fn send(&self, message: Message<T>) -> Result<(), SinkError> {
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let scripted = self.fail_at_attempt.load(Ordering::Relaxed) == attempt;

        if self.fail_on_send.swap(false, Ordering::Relaxed) || scripted {
            self.messages_failed.fetch_add(1, Ordering::Relaxed);
            let context = SendContext::for_message(&message).with_target(self.name.clone());
            return Err(SinkError::send_failed_with_context(
                "Simulated failure",
                context,
            ));
        }

        self.messages.lock().push(message);
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn metadata(&self) -> SinkMetadata {
        SinkMetadata::new(self.name.clone(), "collector").with_counts(
            self.messages_sent.load(Ordering::Relaxed),
            self.messages_failed.load(Ordering::Relaxed),
        )
    }
}

/// A sink that always fails for testing error conditions
#[derive(Debug)]
pub struct FailingSink {
    error_message: String,
    attempts: AtomicUsize,
}

impl FailingSink {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

impl Default for FailingSink {
    fn default() -> Self {
        Self::new("Simulated failure")
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> MessageSink<T> for FailingSink {
    async fn send(&self, message: Message<T>) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let context = SendContext::for_message(&message).with_target("failing-sink");
        Err(SinkError::send_failed_with_context(
            &self.error_message,
            context,
        ))
    }

    fn metadata(&self) -> SinkMetadata {
        SinkMetadata {
            name: "failing-sink".to_string(),
            sink_type: "test-failing".to_string(),
            messages_sent: 0,
            messages_failed: self.attempts.load(Ordering::Relaxed) as u64,
            last_error: Some(self.error_message.clone()),
        }
    }
}
