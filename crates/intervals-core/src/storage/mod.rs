mod config;
pub mod database;
pub mod history;
pub mod memory;
pub mod snapshot;

pub use config::{Config, DriverConfig, TimerDefaults};
pub use database::Database;
pub use history::{HistoryArchive, TimerSummary, WorkoutHistoryEntry, HISTORY_KEY};
pub use memory::MemoryStore;
pub use snapshot::{restore, save_snapshot, Autosaver, WorkoutSnapshot, SNAPSHOT_KEY};

use std::path::PathBuf;

use crate::error::StorageError;

/// Durable string key-value storage.
///
/// The workout snapshot and the history archive are the only keys the core
/// writes. Implementations must be shareable across the driver tasks.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it when missing.
///
/// `INTERVALS_DATA_DIR` wins when set. Otherwise `~/.config/intervals[-dev]/`
/// is used, with `INTERVALS_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("INTERVALS_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("INTERVALS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("intervals-dev")
            } else {
                base_dir.join("intervals")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
