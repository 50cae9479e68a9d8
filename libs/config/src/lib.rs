//! # Integration configuration
//!
//! One place to configure a pipeline: the message store capacity, splitter
//! behaviour and logging. Settings come from a TOML file, an optional
//! per-environment overlay, and `CONDUIT_` environment variables, in that
//! order of precedence.
//!
//! ## Usage
//!
//! ```rust
//! use integration_config::IntegrationConfig;
//!
//! let config = IntegrationConfig::from_toml_str(
//!     r#"
//!     [store]
//!     capacity = 64
//!
//!     [splitter]
//!     name = "order-lines"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.store.capacity, 64);
//! assert_eq!(config.logging.level, "info");
//! ```

pub mod logging;
pub mod settings;

pub use logging::init_tracing;
pub use settings::{load_config, IntegrationConfig, LoggingSettings};
