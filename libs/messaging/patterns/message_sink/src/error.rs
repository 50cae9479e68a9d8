use message::{Message, MessageId};

/// Context information for send operations to aid in debugging
#[derive(Debug, Clone, Default)]
pub struct SendContext {
    /// Id of the message that failed
    pub message_id: Option<MessageId>,
    /// Correlation ID linking the message to its trigger, if any
    pub correlation_id: Option<MessageId>,
    /// Position within a split group, if any
    pub sequence_number: Option<u32>,
    /// Timestamp when send was attempted (nanoseconds since epoch)
    pub timestamp_ns: u64,
    /// Target sink name, if available
    pub target: Option<String>,
}

impl SendContext {
    pub fn new(timestamp_ns: u64) -> Self {
        Self {
            timestamp_ns,
            ..Default::default()
        }
    }

    /// Capture the identifying headers of a message
    pub fn for_message<T>(message: &Message<T>) -> Self {
        let headers = message.headers();
        Self {
            message_id: Some(message.id()),
            correlation_id: headers.correlation_id(),
            sequence_number: headers.sequence_number(),
            timestamp_ns: crate::current_timestamp_ns(),
            target: None,
        }
    }

    pub fn with_correlation_id(mut self, id: MessageId) -> Self {
        self.correlation_id = Some(id);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SinkError {
    #[error("Send failed: {error} (id: {message_id:?}, correlation: {correlation_id:?}, seq: {sequence_number:?}, target: {target:?})",
            message_id = context.message_id,
            correlation_id = context.correlation_id,
            sequence_number = context.sequence_number,
            target = context.target)]
    SendFailed { error: String, context: SendContext },

    #[error("Buffer full, message dropped (id: {message_id:?}, target: {target:?})",
            message_id = context.message_id,
            target = context.target)]
    BufferFull { context: SendContext },

    #[error("Sink closed")]
    Closed,

    #[error("Timeout after {0} ms")]
    Timeout(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SinkError {
    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SinkError::Timeout(_) | SinkError::BufferFull { .. })
    }

    /// Get the failing message's context, if the error carries one
    pub fn context(&self) -> Option<&SendContext> {
        match self {
            SinkError::SendFailed { context, .. } | SinkError::BufferFull { context } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// Create a send failed error with context
    pub fn send_failed_with_context(msg: impl Into<String>, context: SendContext) -> Self {
        SinkError::SendFailed {
            error: msg.into(),
            context,
        }
    }

    /// Create a send failed error with a minimal context
    pub fn send_failed(msg: impl Into<String>) -> Self {
        SinkError::SendFailed {
            error: msg.into(),
            context: SendContext::new(crate::current_timestamp_ns()),
        }
    }

    /// Create a buffer full error with context
    pub fn buffer_full_with_context(context: SendContext) -> Self {
        SinkError::BufferFull { context }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        SinkError::InvalidConfig(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(millis: u64) -> Self {
        SinkError::Timeout(millis)
    }
}
