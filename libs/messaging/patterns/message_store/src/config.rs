//! Store configuration

use crate::StoreError;
use serde::{Deserialize, Serialize};

/// Default number of messages a store holds before evicting
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Maximum number of stored messages
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl StoreConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Create from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, StoreError> {
        toml::from_str(toml_str)
            .map_err(|e| StoreError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.capacity == 0 {
            return Err(StoreError::invalid_argument(
                "Store capacity must be greater than 0",
            ));
        }
        Ok(())
    }
}
