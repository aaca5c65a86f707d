//! Tracing subscriber setup.
//!
//! One-shot commands log to stderr. The TUI owns the terminal, so it only logs
//! when a log file is configured.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{ENV_LOG, LogConfig};
use crate::error::AppError;

/// Install the global subscriber. `interactive` is true for the TUI.
pub fn init(config: &LogConfig, interactive: bool) -> Result<(), AppError> {
    let directive = resolve_directive(config, std::env::var(ENV_LOG).ok());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| AppError::new(2, format!("Invalid log filter '{directive}': {e}")))?;

    match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::new(2, format!("Failed to open log file '{}': {e}", path.display())))?;
            tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter)
                .try_init()
                .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))?;
            tracing::info!(path = %path.display(), "tickets log started");
        }
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .try_init()
                .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))?;
        }
    }

    Ok(())
}

/// Flag beats environment beats default (`info` for files, `warn` otherwise).
fn resolve_directive(config: &LogConfig, env: Option<String>) -> String {
    let default = if config.file.is_some() { "info" } else { "warn" };
    config
        .filter
        .clone()
        .or(env)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}
