use serde::Serialize;

use super::state::{WorkoutState, WorkoutStatus};
use crate::timer::{
    display_seconds, segment_length, total_duration, IntervalCursor, Phase, TimerKind, TimerState,
};

/// Per-timer display fields, recomputed from the workout state on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerView {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub kind: TimerKind,
    pub title: &'static str,
    pub state: TimerState,
    pub is_active: bool,
    /// Present for xy and tabata timers.
    pub current_round: Option<u32>,
    pub total_rounds: Option<u32>,
    /// Present for tabata timers.
    pub phase: Option<Phase>,
    /// Clock value: remaining seconds for countdowns, elapsed otherwise.
    pub display_seconds: u64,
    /// Length of the segment shown on the clock.
    pub segment_seconds: u64,
    pub total_seconds: u64,
}

impl TimerView {
    pub(crate) fn derive(state: &WorkoutState, index: usize) -> Option<Self> {
        let timer = state.timers.get(index)?;
        let is_active = state.active_index == Some(index);
        let completed = timer.is_completed();

        let display_state = if completed {
            TimerState::Completed
        } else if is_active {
            match state.status {
                WorkoutStatus::Paused => TimerState::Paused,
                _ => TimerState::Running,
            }
        } else {
            TimerState::NotRunning
        };

        let cursor = if is_active {
            state.cursor
        } else {
            IntervalCursor::default()
        };

        let rounds = timer.rounds_or_one();
        let current_round = timer.kind.is_round_based().then(|| {
            if completed {
                rounds
            } else {
                cursor.round
            }
        });

        let display = if is_active {
            display_seconds(timer, state.elapsed_ticks)
        } else if completed {
            match timer.kind {
                TimerKind::Countdown => 0,
                _ => segment_length(timer, cursor),
            }
        } else {
            match timer.kind {
                TimerKind::Countdown => timer.duration,
                _ => 0,
            }
        };

        Some(Self {
            index,
            id: timer.id.clone(),
            name: timer.name.clone(),
            kind: timer.kind,
            title: timer.kind.title(),
            state: display_state,
            is_active,
            current_round,
            total_rounds: timer.kind.is_round_based().then_some(rounds),
            phase: (timer.kind == TimerKind::Tabata).then(|| cursor.phase()),
            display_seconds: display,
            segment_seconds: segment_length(timer, cursor),
            total_seconds: total_duration(timer),
        })
    }
}

/// `MM:SS`, minutes unbounded.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `Xm Ys`, or `Ys` under a minute.
pub fn format_compact(secs: u64) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;
    if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
