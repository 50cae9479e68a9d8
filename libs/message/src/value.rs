//! Dynamically typed header values
//!
//! Headers carry values of a handful of shapes. Consumers read them back
//! through [`FromValue`], which refuses to coerce between shapes: asking for
//! text when the header holds an integer is a [`MessageError::TypeMismatch`].

use crate::{MessageError, MessageId};
use std::fmt;

/// A header value (also usable as a loosely typed payload)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Id(MessageId),
    Bytes(Vec<u8>),
}

impl Value {
    /// Name of the value's shape, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Id(_) => "id",
            Value::Bytes(_) => "bytes",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<MessageId> {
        match self {
            Value::Id(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Id(id) => write!(f, "{}", id),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<MessageId> for Value {
    fn from(value: MessageId) -> Self {
        Value::Id(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

/// Typed extraction from a [`Value`]
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, MessageError>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, MessageError> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, MessageError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| MessageError::type_mismatch("text", value.type_name()))
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, MessageError> {
        value
            .as_integer()
            .ok_or_else(|| MessageError::type_mismatch("integer", value.type_name()))
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> Result<Self, MessageError> {
        value
            .as_integer()
            .and_then(|i| u32::try_from(i).ok())
            .ok_or_else(|| MessageError::type_mismatch("unsigned integer", value.type_name()))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, MessageError> {
        value
            .as_bool()
            .ok_or_else(|| MessageError::type_mismatch("boolean", value.type_name()))
    }
}

impl FromValue for MessageId {
    fn from_value(value: &Value) -> Result<Self, MessageError> {
        value
            .as_id()
            .ok_or_else(|| MessageError::type_mismatch("id", value.type_name()))
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, MessageError> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            other => Err(MessageError::type_mismatch("bytes", other.type_name())),
        }
    }
}
