mod config;

pub use config::{Config, SchedulingConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/taskdeck[-dev]/` based on TASKDECK_ENV.
///
/// Set TASKDECK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKDECK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("taskdeck-dev")
    } else {
        base_dir.join("taskdeck")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Default location of the accepted-block ledger.
pub fn ledger_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("blocks.json"))
}
