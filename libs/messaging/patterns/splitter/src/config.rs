//! Splitter configuration

use crate::SplitError;
use serde::{Deserialize, Serialize};

/// Who decides the sequence headers of a message item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// Correlation and sequence headers are always stamped by the splitter
    #[default]
    EngineAssigned,
    /// Message items keep correlation and sequence headers they already carry
    PreserveProducer,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Endpoint name used in logs and sink error context
    pub name: String,
    pub sequence_policy: SequencePolicy,
    /// Copy the inbound message's user headers onto outputs that lack them
    pub copy_inbound_headers: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            name: "splitter".to_string(),
            sequence_policy: SequencePolicy::default(),
            copy_inbound_headers: false,
        }
    }
}

impl SplitterConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, SplitError> {
        toml::from_str(toml_str)
            .map_err(|e| SplitError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    pub fn validate(&self) -> Result<(), SplitError> {
        if self.name.trim().is_empty() {
            return Err(SplitError::InvalidConfig(
                "Splitter name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
