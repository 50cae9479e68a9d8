//! Header mapping between wire properties and message headers
//!
//! Mapping is best effort in both directions: anything the other side cannot
//! carry is dropped, never reported as an error.

use crate::WireMessage;
use message::{keys, MessageHeaders, MessageId, Value};

/// Maps headers between an external message type `E` and the header set
pub trait HeaderMapper<E>: Send + Sync {
    /// Header entries to build an inbound message with
    fn map_inbound(&self, external: &E) -> Vec<(String, Value)>;

    /// Copy whatever `external` can carry from `headers`
    fn map_outbound(&self, headers: &MessageHeaders, external: &mut E);
}

/// Maps `correlationId` to the wire correlation id and other headers to
/// string properties.
///
/// Outbound, only text, integer and boolean headers become properties; `id`
/// stays behind because every message gets a fresh one. Inbound, a property
/// that parses as an integer or boolean is read back as one, so a text header
/// holding `"42"` comes back as an integer.
#[derive(Debug, Clone, Default)]
pub struct DefaultHeaderMapper {
    property_prefix: Option<String>,
}

impl DefaultHeaderMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only map properties carrying `prefix`, stripping it inbound and adding it outbound
    pub fn with_property_prefix(prefix: impl Into<String>) -> Self {
        Self {
            property_prefix: Some(prefix.into()),
        }
    }

    fn inbound_key<'a>(&self, property: &'a str) -> Option<&'a str> {
        match &self.property_prefix {
            Some(prefix) => property.strip_prefix(prefix.as_str()),
            None => Some(property),
        }
    }

    fn outbound_key(&self, header: &str) -> String {
        match &self.property_prefix {
            Some(prefix) => format!("{}{}", prefix, header),
            None => header.to_string(),
        }
    }
}

fn parse_property(raw: &str) -> Value {
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::Integer(integer);
    }
    match raw {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => Value::Text(raw.to_string()),
    }
}

impl HeaderMapper<WireMessage> for DefaultHeaderMapper {
    fn map_inbound(&self, wire: &WireMessage) -> Vec<(String, Value)> {
        let mut entries = Vec::with_capacity(wire.properties.len() + 1);

        if let Some(raw) = &wire.correlation_id {
            let value = match raw.parse::<MessageId>() {
                Ok(id) => Value::Id(id),
                Err(_) => Value::Text(raw.clone()),
            };
            entries.push((keys::CORRELATION_ID.to_string(), value));
        }

        for (property, raw) in &wire.properties {
            let Some(key) = self.inbound_key(property) else {
                continue;
            };
            if key == keys::ID || key == keys::CORRELATION_ID || key.is_empty() {
                continue;
            }
            entries.push((key.to_string(), parse_property(raw)));
        }
        entries
    }

    fn map_outbound(&self, headers: &MessageHeaders, wire: &mut WireMessage) {
        for (key, value) in headers.iter() {
            match (key, value) {
                (keys::ID, _) => {}
                (keys::CORRELATION_ID, Value::Id(id)) => {
                    wire.correlation_id = Some(id.to_string());
                }
                (keys::CORRELATION_ID, Value::Text(text)) => {
                    wire.correlation_id = Some(text.clone());
                }
                (_, Value::Text(text)) => {
                    wire.properties.insert(self.outbound_key(key), text.clone());
                }
                (_, Value::Integer(i)) => {
                    wire.properties.insert(self.outbound_key(key), i.to_string());
                }
                (_, Value::Boolean(b)) => {
                    wire.properties.insert(self.outbound_key(key), b.to_string());
                }
                (_, other) => {
                    tracing::trace!(
                        "Dropping header '{}' of type {} with no wire representation",
                        key,
                        other.type_name()
                    );
                }
            }
        }
    }
}
