use thiserror::Error;

/// Errors raised while building messages or reading typed header values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// A required input (payload, key) was missing
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A value had a different shape than the caller asked for
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl MessageError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        MessageError::InvalidArgument(msg.into())
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        MessageError::TypeMismatch { expected, found }
    }

    /// Check if this is a type mismatch
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, MessageError::TypeMismatch { .. })
    }
}
