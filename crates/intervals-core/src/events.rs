use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{IntervalCursor, TimerKind};
use crate::workout::WorkoutStatus;

/// Every reducer transition produces at most one Event.
/// The CLI prints them; callers may log or forward them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimersChanged {
        count: usize,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    WorkoutStarted {
        timer_index: usize,
        timer_kind: TimerKind,
        at: DateTime<Utc>,
    },
    StatusChanged {
        status: WorkoutStatus,
        at: DateTime<Utc>,
    },
    Ticked {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SegmentAdvanced {
        timer_index: usize,
        cursor: IntervalCursor,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        timer_index: usize,
        timer_name: String,
        next_index: Option<usize>,
        at: DateTime<Utc>,
    },
    WorkoutCompleted {
        history_id: String,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    WorkoutReset {
        at: DateTime<Utc>,
    },
    StateLoaded {
        timer_count: usize,
        status: WorkoutStatus,
        at: DateTime<Utc>,
    },
}
