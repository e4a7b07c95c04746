//! Append-only archive of completed workouts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::error::StorageError;
use crate::timer::{total_duration, total_workout_duration, TimerDefinition, TimerKind, TimerState};

/// Storage key of the archive.
pub const HISTORY_KEY: &str = "workoutHistory";

/// Reduced view of one timer inside a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TimerKind,
    /// Total run length in seconds, derived for round-based timers.
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_time: Option<u64>,
}

impl From<&TimerDefinition> for TimerSummary {
    fn from(timer: &TimerDefinition) -> Self {
        Self {
            id: timer.id.clone(),
            name: timer.name.clone(),
            kind: timer.kind,
            duration: total_duration(timer),
            rounds: timer.rounds,
            round_time: timer.round_time,
            work_time: timer.work_time,
            rest_time: timer.rest_time,
        }
    }
}

/// A completed workout. Written once and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutHistoryEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub total_duration: u64,
    pub timers: Vec<TimerSummary>,
}

impl WorkoutHistoryEntry {
    /// Summarize a finished workout.
    pub fn from_timers(timers: &[TimerDefinition], completed_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: completed_at,
            total_duration: total_workout_duration(timers),
            timers: timers.iter().map(TimerSummary::from).collect(),
        }
    }

    /// Fresh timers for running this workout again.
    ///
    /// Every timer gets a new id and creation time and starts not running.
    pub fn repeat_timers(&self) -> Vec<TimerDefinition> {
        let now = Utc::now().timestamp_millis();
        self.timers
            .iter()
            .enumerate()
            .map(|(i, summary)| TimerDefinition {
                id: uuid::Uuid::new_v4().to_string(),
                kind: summary.kind,
                name: if summary.name.trim().is_empty() {
                    format!("Timer {}", i + 1)
                } else {
                    summary.name.clone()
                },
                duration: summary.duration,
                round_time: summary.round_time,
                work_time: summary.work_time,
                rest_time: summary.rest_time,
                rounds: summary.rounds,
                state: TimerState::NotRunning,
                added_at: now,
            })
            .collect()
    }
}

/// Archive of completed workouts, newest last.
#[derive(Clone)]
pub struct HistoryArchive {
    kv: Arc<dyn KeyValueStore>,
}

impl HistoryArchive {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// All entries in insertion order. Unreadable archives read as empty.
    pub fn list(&self) -> Vec<WorkoutHistoryEntry> {
        match self.kv.get(HISTORY_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::debug!("ignoring malformed workout history: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("could not read workout history: {e}");
                Vec::new()
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<WorkoutHistoryEntry> {
        self.list().into_iter().find(|entry| entry.id == id)
    }

    /// Read the archive, append `entry` and write it back.
    ///
    /// # Errors
    /// Returns an error if the archive cannot be written.
    pub fn append(&self, entry: WorkoutHistoryEntry) -> Result<(), StorageError> {
        let mut entries = self.list();
        entries.push(entry);
        let raw = serde_json::to_string(&entries).map_err(|e| StorageError::Encode {
            key: HISTORY_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.kv.set(HISTORY_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn sample_timers() -> Vec<TimerDefinition> {
        vec![
            TimerDefinition::countdown("Warmup", 60),
            TimerDefinition::xy("EMOM", 3, 45),
            TimerDefinition::tabata("Finisher", 8, 20, 10),
        ]
    }

    #[test]
    fn entry_summarizes_derived_totals() {
        let entry = WorkoutHistoryEntry::from_timers(&sample_timers(), Utc::now());
        assert_eq!(entry.total_duration, 60 + 135 + 240);
        assert_eq!(entry.timers[1].duration, 135);
        assert_eq!(entry.timers[2].work_time, Some(20));
        assert_eq!(entry.timers[0].rounds, None);
    }

    #[test]
    fn append_keeps_insertion_order() {
        let archive = HistoryArchive::new(Arc::new(MemoryStore::new()));
        assert!(archive.list().is_empty());

        let first = WorkoutHistoryEntry::from_timers(&sample_timers(), Utc::now());
        let second = WorkoutHistoryEntry::from_timers(&sample_timers()[..1], Utc::now());
        archive.append(first.clone()).unwrap();
        archive.append(second.clone()).unwrap();

        let listed = archive.list();
        assert_eq!(listed, vec![first.clone(), second]);
        assert_eq!(archive.find(&first.id), Some(first));
        assert_eq!(archive.find("missing"), None);
    }

    #[test]
    fn malformed_archive_reads_empty_and_is_replaced_on_append() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(HISTORY_KEY, "not json").unwrap();
        let archive = HistoryArchive::new(kv);
        assert!(archive.list().is_empty());

        archive
            .append(WorkoutHistoryEntry::from_timers(&sample_timers(), Utc::now()))
            .unwrap();
        assert_eq!(archive.list().len(), 1);
    }

    #[test]
    fn repeat_timers_are_fresh_copies() {
        let timers = sample_timers();
        let entry = WorkoutHistoryEntry::from_timers(&timers, Utc::now());
        let repeated = entry.repeat_timers();
        assert_eq!(repeated.len(), 3);
        for (original, copy) in timers.iter().zip(&repeated) {
            assert_ne!(original.id, copy.id);
            assert_eq!(original.name, copy.name);
            assert_eq!(total_duration(original), total_duration(copy));
            assert_eq!(copy.state, TimerState::NotRunning);
        }
    }

    #[test]
    fn wire_format_is_camel_case() {
        let entry = WorkoutHistoryEntry::from_timers(&sample_timers(), Utc::now());
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("totalDuration").is_some());
        assert_eq!(value["timers"][2]["type"], "tabata");
        assert_eq!(value["timers"][2]["restTime"], 10);
    }
}
