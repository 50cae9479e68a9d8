//! Pipeline configuration
//!
//! Loads the base TOML file, overlays `environments/<env>.toml` from the
//! same directory when present, then applies `CONDUIT_` environment
//! variables (`CONDUIT_STORE__CAPACITY=64`).

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use message_store::StoreConfig;
use serde::{Deserialize, Serialize};
use splitter::SplitterConfig;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default location of the base configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/conduit.toml";

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "CONDUIT";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub logging: LoggingSettings,
    pub store: StoreConfig,
    pub splitter: SplitterConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level; `RUST_LOG` takes precedence when set
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl IntegrationConfig {
    /// Load configuration from files with environment overrides
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

        let mut builder = Config::builder().add_source(File::from(base).required(true));

        if let Some(env) = environment {
            let env_file = environment_file(base, env);
            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;

        info!(
            "Loaded configuration from {:?}: store capacity {}, splitter '{}'",
            base, config.store.capacity, config.splitter.name
        );
        Ok(config)
    }

    /// Parse inline TOML; missing sections take their defaults
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.store
            .validate()
            .context("Invalid [store] configuration")?;
        self.splitter
            .validate()
            .context("Invalid [splitter] configuration")?;
        if self.logging.level.parse::<tracing::Level>().is_err() {
            bail!("Unknown log level '{}'", self.logging.level);
        }
        Ok(())
    }
}

fn environment_file(base: &Path, environment: &str) -> PathBuf {
    base.parent()
        .unwrap_or(Path::new("."))
        .join("environments")
        .join(format!("{}.toml", environment))
}

/// Convenience function to load configuration from the default location
pub fn load_config(environment: Option<&str>) -> Result<IntegrationConfig> {
    IntegrationConfig::load(None, environment)
}
