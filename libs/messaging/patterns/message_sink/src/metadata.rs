/// Information about a sink for monitoring/debugging
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkMetadata {
    /// Human-readable sink name
    pub name: String,

    /// Sink type (queue, direct, collector, etc.)
    pub sink_type: String,

    /// Messages delivered successfully
    pub messages_sent: u64,

    /// Messages rejected
    pub messages_failed: u64,

    /// Last error if any
    pub last_error: Option<String>,
}

impl SinkMetadata {
    /// Create new metadata with name and type
    pub fn new(name: impl Into<String>, sink_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sink_type: sink_type.into(),
            ..Default::default()
        }
    }

    /// Set counters
    pub fn with_counts(mut self, sent: u64, failed: u64) -> Self {
        self.messages_sent = sent;
        self.messages_failed = failed;
        self
    }

    /// Record successful message send
    pub fn record_success(&mut self) {
        self.messages_sent += 1;
    }

    /// Record failed message send
    pub fn record_failure(&mut self, error: Option<String>) {
        self.messages_failed += 1;
        self.last_error = error;
    }

    /// Fraction of failed sends, if anything was attempted
    pub fn error_rate(&self) -> Option<f64> {
        let total = self.messages_sent + self.messages_failed;
        if total == 0 {
            None
        } else {
            Some(self.messages_failed as f64 / total as f64)
        }
    }
}
