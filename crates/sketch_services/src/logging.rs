//! Logging initialisation
//!
//! Installs a `tracing-subscriber` fmt subscriber once per process. The
//! `RUST_LOG` environment variable overrides the configured level.

use crate::settings::LogSettings;
use std::sync::OnceLock;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LogError {
    #[error("logging already initialized")]
    AlreadyInitialized,

    #[error("invalid log filter '{0}'")]
    InvalidFilter(String),

    #[error("failed to set global subscriber: {0}")]
    SetSubscriber(String),
}

pub fn init_logging(settings: &LogSettings) -> Result<(), LogError> {
    if LOGGING_INITIALIZED.get().is_some() {
        return Err(LogError::AlreadyInitialized);
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|_| LogError::InvalidFilter(settings.level.clone()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| LogError::SetSubscriber(err.to_string()))?;

    let _ = LOGGING_INITIALIZED.set(());
    Ok(())
}
