//! Payload converters and the header mapping composite

use crate::{ConversionError, DefaultHeaderMapper, HeaderMapper, WireMessage};
use message::{Message, MessageBuilder, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// Converts between an external message type `E` and a payload
pub trait PayloadConverter<E>: Send + Sync {
    type Payload;

    fn to_payload(&self, external: &E) -> Result<Self::Payload, ConversionError>;

    /// A fresh external message carrying `payload` and nothing else
    fn to_external(&self, payload: &Self::Payload) -> Result<E, ConversionError>;
}

/// UTF-8 text body
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Converter;

impl PayloadConverter<WireMessage> for Utf8Converter {
    type Payload = String;

    fn to_payload(&self, wire: &WireMessage) -> Result<String, ConversionError> {
        String::from_utf8(wire.body.clone())
            .map_err(|e| ConversionError::Malformed(format!("body is not UTF-8: {}", e)))
    }

    fn to_external(&self, payload: &String) -> Result<WireMessage, ConversionError> {
        Ok(WireMessage::new(payload.as_bytes()))
    }
}

/// Text when the body is UTF-8, bytes otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueConverter;

impl PayloadConverter<WireMessage> for ValueConverter {
    type Payload = Value;

    fn to_payload(&self, wire: &WireMessage) -> Result<Value, ConversionError> {
        Ok(match std::str::from_utf8(&wire.body) {
            Ok(text) => Value::from(text),
            Err(_) => Value::Bytes(wire.body.clone()),
        })
    }

    fn to_external(&self, payload: &Value) -> Result<WireMessage, ConversionError> {
        match payload {
            Value::Text(text) => Ok(WireMessage::new(text.as_bytes())),
            Value::Bytes(bytes) => Ok(WireMessage::new(bytes.clone())),
            other => Err(ConversionError::UnsupportedPayload(format!(
                "{} payloads have no wire body",
                other.type_name()
            ))),
        }
    }
}

/// JSON body decoded into `T`
pub struct JsonConverter<T> {
    _payload: PhantomData<fn() -> T>,
}

impl<T> JsonConverter<T> {
    pub fn new() -> Self {
        Self {
            _payload: PhantomData,
        }
    }
}

impl<T> Default for JsonConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonConverter")
    }
}

impl<T> PayloadConverter<WireMessage> for JsonConverter<T>
where
    T: Serialize + DeserializeOwned,
{
    type Payload = T;

    fn to_payload(&self, wire: &WireMessage) -> Result<T, ConversionError> {
        Ok(serde_json::from_slice(&wire.body)?)
    }

    fn to_external(&self, payload: &T) -> Result<WireMessage, ConversionError> {
        Ok(WireMessage::new(serde_json::to_vec(payload)?))
    }
}

/// Delegates the payload to a converter and the headers to a mapper
#[derive(Debug, Clone, Default)]
pub struct HeaderMappingConverter<C, M = DefaultHeaderMapper> {
    converter: C,
    mapper: M,
}

impl<C> HeaderMappingConverter<C, DefaultHeaderMapper> {
    pub fn with_default_mapper(converter: C) -> Self {
        Self::new(converter, DefaultHeaderMapper::default())
    }
}

impl<C, M> HeaderMappingConverter<C, M> {
    pub fn new(converter: C, mapper: M) -> Self {
        Self { converter, mapper }
    }

    pub fn from_wire<E>(&self, external: &E) -> Result<Message<<C as PayloadConverter<E>>::Payload>, ConversionError>
    where
        C: PayloadConverter<E>,
        M: HeaderMapper<E>,
    {
        let payload = self.converter.to_payload(external)?;
        let headers = self.mapper.map_inbound(external);
        let message = MessageBuilder::with_payload(payload)
            .copy_headers(headers)
            .build()?;
        tracing::debug!(
            "Converted wire message to message {} with {} headers",
            message.id(),
            message.headers().len()
        );
        Ok(message)
    }

    pub fn to_wire<E>(
        &self,
        message: &Message<<C as PayloadConverter<E>>::Payload>,
    ) -> Result<E, ConversionError>
    where
        C: PayloadConverter<E>,
        M: HeaderMapper<E>,
    {
        let mut external = self.converter.to_external(message.payload())?;
        self.mapper.map_outbound(message.headers(), &mut external);
        tracing::debug!("Converted message {} to wire message", message.id());
        Ok(external)
    }
}
