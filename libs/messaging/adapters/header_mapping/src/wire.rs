//! In-memory wire form exchanged with transports

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A transport message: opaque body, correlation id and string properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WireMessage {
    pub body: Vec<u8>,
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl WireMessage {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
