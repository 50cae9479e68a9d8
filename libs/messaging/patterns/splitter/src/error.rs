use message::{MessageError, MessageId};
use message_sink::SinkError;
use thiserror::Error;

/// Failure of the production step for one inbound message
#[derive(Debug, Error)]
pub enum ProductionError {
    /// The inbound payload or header had a different shape than the producer takes
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A producer bound to a header was invoked on a message without it
    #[error("Required header '{0}' is missing")]
    MissingHeader(String),

    #[error("Producer failed: {0}")]
    Failed(#[source] anyhow::Error),
}

impl ProductionError {
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ProductionError::TypeMismatch { .. })
    }
}

impl From<MessageError> for ProductionError {
    fn from(error: MessageError) -> Self {
        match error {
            MessageError::TypeMismatch { expected, found } => {
                ProductionError::TypeMismatch { expected, found }
            }
            other => ProductionError::Failed(other.into()),
        }
    }
}

/// Recovers typed failures that a producer closure returned through `?`
impl From<anyhow::Error> for ProductionError {
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<ProductionError>() {
            Ok(production) => return production,
            Err(error) => error,
        };
        match error.downcast::<MessageError>() {
            Ok(message_error) => message_error.into(),
            Err(error) => ProductionError::Failed(error),
        }
    }
}

#[derive(Debug, Error)]
pub enum SplitError {
    /// More than one candidate producer is eligible
    #[error("Ambiguous producer for '{0}': more than one candidate is eligible")]
    AmbiguousProducer(String),

    #[error("No eligible producer found for '{0}'")]
    NoProducerFound(String),

    /// Nothing was stamped or dispatched
    #[error("Production failed: {0}")]
    ProductionFailed(#[from] ProductionError),

    /// Messages before `sequence_number` were delivered, later ones were not attempted
    #[error(
        "Dispatch failed for message {sequence_number} of {sequence_size} (correlation: {correlation_id}): {source}"
    )]
    DispatchFailed {
        sequence_number: u32,
        sequence_size: u32,
        correlation_id: MessageId,
        #[source]
        source: SinkError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SplitError {
    /// Raised while wiring the splitter rather than while handling a message
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SplitError::AmbiguousProducer(_)
                | SplitError::NoProducerFound(_)
                | SplitError::InvalidConfig(_)
        )
    }

    /// Position of the message the sink rejected
    pub fn failed_sequence_number(&self) -> Option<u32> {
        match self {
            SplitError::DispatchFailed {
                sequence_number, ..
            } => Some(*sequence_number),
            _ => None,
        }
    }
}
