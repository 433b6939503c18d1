mod config;
pub mod database;
mod kv;

pub use config::{CoachConfig, Config, SessionConfig};
pub use database::Database;
pub use kv::{KvStore, MemoryStore};

use std::path::PathBuf;

/// Returns `~/.config/lockin[-dev]/` based on LOCKIN_ENV.
///
/// Set LOCKIN_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LOCKIN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("lockin-dev")
    } else {
        base_dir.join("lockin")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
