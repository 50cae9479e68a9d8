use crate::SinkError;

/// Outcome of sending several messages one after another
///
/// Sends are not transactional: messages before a failure stay delivered.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Number of messages delivered
    pub succeeded: usize,

    /// Indices (0-based, in batch order) of rejected messages with their errors
    pub failed: Vec<(usize, SinkError)>,

    /// Total number of messages in the batch
    pub total: usize,
}

impl BatchResult {
    pub fn new(total: usize) -> Self {
        Self {
            succeeded: 0,
            failed: Vec::new(),
            total,
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, index: usize, error: SinkError) {
        self.failed.push((index, error));
    }

    /// Check if all messages were delivered
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.succeeded == self.total
    }

    /// Check if some but not all messages were delivered
    pub fn has_partial_success(&self) -> bool {
        self.succeeded > 0 && !self.failed.is_empty()
    }

    /// Earliest rejected message, if any
    pub fn first_failure(&self) -> Option<&(usize, SinkError)> {
        self.failed.iter().min_by_key(|(index, _)| *index)
    }
}
