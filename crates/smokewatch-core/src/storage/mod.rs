//! Persistence: the SQLite key-value store and TOML configuration.

mod config;
pub mod database;

pub use config::{Config, TimerConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/smokewatch[-dev]/` based on SMOKEWATCH_ENV, or the
/// directory named by SMOKEWATCH_DATA_DIR when that is set (tests point it
/// at a scratch dir). The directory is created on first use.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var("SMOKEWATCH_DATA_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SMOKEWATCH_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base.join("smokewatch-dev")
            } else {
                base.join("smokewatch")
            }
        }
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
