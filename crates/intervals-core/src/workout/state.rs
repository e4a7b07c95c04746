use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timer::{total_workout_duration, IntervalCursor, TimerDefinition};

/// Workout-level run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkoutStatus {
    #[default]
    Ready,
    Running,
    Paused,
    Complete,
}

impl fmt::Display for WorkoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkoutStatus::Ready => "READY",
            WorkoutStatus::Running => "RUNNING",
            WorkoutStatus::Paused => "PAUSED",
            WorkoutStatus::Complete => "COMPLETE",
        })
    }
}

/// The ordered timer list plus run-state.
///
/// Only [`WorkoutStore`](super::WorkoutStore) mutates this; everything else
/// sees it through a shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkoutState {
    pub timers: Vec<TimerDefinition>,
    pub status: WorkoutStatus,
    pub active_index: Option<usize>,
    /// Whole seconds since the current segment of the active timer began.
    pub elapsed_ticks: u64,
    /// Round and phase of the active timer.
    pub cursor: IntervalCursor,
}

impl WorkoutState {
    pub fn active_timer(&self) -> Option<&TimerDefinition> {
        self.active_index.and_then(|i| self.timers.get(i))
    }

    pub fn is_running(&self) -> bool {
        self.status == WorkoutStatus::Running
    }

    pub fn total_duration(&self) -> u64 {
        total_workout_duration(&self.timers)
    }

    pub(crate) fn clear_segment(&mut self) {
        self.elapsed_ticks = 0;
        self.cursor = IntervalCursor::default();
    }
}
