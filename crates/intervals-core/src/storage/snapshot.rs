//! Workout snapshot persistence.
//!
//! The whole workout state is written under [`SNAPSHOT_KEY`] as JSON:
//!
//! ```json
//! {"timers": [...], "timerStatus": "RUNNING", "activeTimerIndex": 0,
//!  "globalTimer": 12, "lastSavedAt": 1700000000000,
//!  "intervalCursor": {"round": 2, "work": false}}
//! ```
//!
//! Reads are forgiving: a missing field takes its default and an unreadable
//! snapshot is treated as absent.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::error::StorageError;
use crate::task::{spawn_periodic, TaskHandle};
use crate::timer::{IntervalCursor, TimerDefinition};
use crate::workout::{Command, SharedStore, WorkoutState, WorkoutStatus, WorkoutStore};

/// Storage key of the workout snapshot.
pub const SNAPSHOT_KEY: &str = "workoutState";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSnapshot {
    #[serde(default)]
    pub timers: Vec<TimerDefinition>,
    #[serde(default)]
    pub timer_status: WorkoutStatus,
    #[serde(default)]
    pub active_timer_index: Option<usize>,
    #[serde(default)]
    pub global_timer: u64,
    /// Epoch milliseconds of the save; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved_at: Option<i64>,
    #[serde(default)]
    pub interval_cursor: IntervalCursor,
}

impl WorkoutSnapshot {
    pub fn capture(state: &WorkoutState) -> Self {
        Self {
            timers: state.timers.clone(),
            timer_status: state.status,
            active_timer_index: state.active_index,
            global_timer: state.elapsed_ticks,
            last_saved_at: Some(chrono::Utc::now().timestamp_millis()),
            interval_cursor: state.cursor,
        }
    }

    /// A READY workout made of `timers`.
    pub fn from_timers(timers: Vec<TimerDefinition>) -> Self {
        Self {
            timers,
            ..Self::default()
        }
    }

    /// Parse a stored snapshot, or `None` if it is not one.
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::debug!("ignoring malformed workout snapshot: {e}");
                None
            }
        }
    }

    /// Convert into live state, dropping an active index that cannot be
    /// right for the stored status or timer list.
    ///
    /// A running or paused workout without a usable active timer is
    /// downgraded to COMPLETE when every timer finished, READY otherwise.
    pub(crate) fn into_state(self) -> WorkoutState {
        let mut active_index = self.active_timer_index;
        let mut status = self.timer_status;
        let idle = matches!(status, WorkoutStatus::Ready | WorkoutStatus::Complete);
        if active_index.is_some_and(|i| idle || i >= self.timers.len()) {
            tracing::debug!(?active_index, %status, "clearing stale active index");
            active_index = None;
        }
        if active_index.is_none() && !idle {
            let finished =
                !self.timers.is_empty() && self.timers.iter().all(TimerDefinition::is_completed);
            status = if finished {
                WorkoutStatus::Complete
            } else {
                WorkoutStatus::Ready
            };
            tracing::debug!(from = %self.timer_status, to = %status, "no active timer in snapshot");
        }

        let (elapsed_ticks, cursor) = if active_index.is_some() {
            (self.global_timer, self.interval_cursor)
        } else {
            (0, IntervalCursor::default())
        };

        WorkoutState {
            timers: self.timers,
            status,
            active_index,
            elapsed_ticks,
            cursor,
        }
    }
}

/// Write the store's current state under [`SNAPSHOT_KEY`].
///
/// # Errors
/// Returns an error if the snapshot cannot be encoded or written.
pub fn save_snapshot(store: &WorkoutStore, kv: &dyn KeyValueStore) -> Result<(), StorageError> {
    write_snapshot(&store.snapshot(), kv)
}

fn write_snapshot(snapshot: &WorkoutSnapshot, kv: &dyn KeyValueStore) -> Result<(), StorageError> {
    let raw = serde_json::to_string(snapshot).map_err(|e| StorageError::Encode {
        key: SNAPSHOT_KEY.to_string(),
        message: e.to_string(),
    })?;
    kv.set(SNAPSHOT_KEY, &raw)
}

/// Load a previously saved snapshot into `store`.
///
/// Returns whether a snapshot was applied. Absent, unreadable or malformed
/// snapshots leave the store untouched.
pub fn restore(store: &mut WorkoutStore, kv: &dyn KeyValueStore) -> bool {
    let raw = match kv.get(SNAPSHOT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return false,
        Err(e) => {
            tracing::debug!("workout snapshot unavailable: {e}");
            return false;
        }
    };
    match WorkoutSnapshot::parse(&raw) {
        Some(snapshot) => {
            store.dispatch(Command::LoadState(snapshot));
            true
        }
        None => false,
    }
}

/// Periodic snapshot writer.
pub struct Autosaver;

impl Autosaver {
    /// Save `store` to `kv` every `period` until the handle is cancelled.
    /// Failed writes are logged and retried on the next period.
    pub fn spawn(store: SharedStore, kv: Arc<dyn KeyValueStore>, period: Duration) -> TaskHandle {
        spawn_periodic("autosaver", period, move || {
            let snapshot = {
                let guard = store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                guard.snapshot()
            };
            if let Err(e) = write_snapshot(&snapshot, kv.as_ref()) {
                tracing::warn!("autosave failed: {e}");
            }
        })
    }
}
