//! Tracing subscriber setup

use crate::LoggingSettings;
use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `settings.level`. Fails instead of panicking when a
/// subscriber is already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("Invalid log level '{}'", settings.level))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(settings.json.then(|| fmt::layer().json()))
        .with((!settings.json).then(fmt::layer))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        "Logging initialised at '{}'{}",
        settings.level,
        if settings.json { " (json)" } else { "" }
    );
    Ok(())
}
