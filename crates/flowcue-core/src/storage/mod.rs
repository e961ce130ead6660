mod config;

pub use config::{AudioConfig, Config, SequenceConfig, TimerConfig};

use std::path::PathBuf;

/// Returns `~/.config/flowcue[-dev]/` based on FLOWCUE_ENV.
///
/// Set FLOWCUE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FLOWCUE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("flowcue-dev")
    } else {
        base_dir.join("flowcue")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
