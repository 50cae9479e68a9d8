use message::MessageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    /// The converter cannot represent this payload on the wire
    #[error("Unsupported payload: {0}")]
    UnsupportedPayload(String),

    /// The wire body could not be read as the expected payload
    #[error("Malformed wire body: {0}")]
    Malformed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] MessageError),
}
