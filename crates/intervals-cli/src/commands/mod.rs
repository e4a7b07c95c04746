pub mod config;
pub mod history;
pub mod share;
pub mod timer;
pub mod workout;

use std::sync::Arc;

use intervals_core::error::Result;
use intervals_core::storage::{restore, save_snapshot};
use intervals_core::{Database, HistoryArchive, KeyValueStore, ValidationError, WorkoutStore};
use serde::Serialize;

pub type CliResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// The persisted workout for the duration of one invocation.
///
/// Opening restores the saved snapshot; [`Session::save`] writes it back.
pub struct Session {
    pub kv: Arc<dyn KeyValueStore>,
    pub store: WorkoutStore,
}

impl Session {
    pub fn open() -> Result<Self> {
        let kv: Arc<dyn KeyValueStore> = Arc::new(Database::open()?);
        let mut store = WorkoutStore::new(HistoryArchive::new(Arc::clone(&kv)));
        if restore(&mut store, kv.as_ref()) {
            tracing::debug!(timers = store.state().timers.len(), "restored saved workout");
        }
        Ok(Self { kv, store })
    }

    pub fn save(&self) -> Result<()> {
        save_snapshot(&self.store, self.kv.as_ref())?;
        Ok(())
    }

    /// Reject an index the store would treat as a contract violation.
    pub fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        let len = self.store.state().timers.len();
        if index < len {
            Ok(())
        } else {
            Err(ValidationError::OutOfBounds {
                collection: "timers".into(),
                index,
                len,
            })
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
