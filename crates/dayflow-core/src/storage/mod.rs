mod config;
pub mod database;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::{Database, APP_STATE_KEY, TIMER_KEY};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `DAYFLOW_DATA_DIR` wins when set. Otherwise `~/.config/dayflow`, or
/// `~/.config/dayflow-dev` with `DAYFLOW_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("DAYFLOW_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("DAYFLOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("dayflow-dev")
            } else {
                base_dir.join("dayflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
