//! Interval state machine for the active timer.
//!
//! The machine is a pure function of the timer, the interval cursor and the
//! whole seconds elapsed since the current segment began:
//!
//! ```text
//! stopwatch / countdown:  [ duration ] -> Complete
//! xy:                     [ round 1 ] -> [ round 2 ] -> ... -> Complete
//! tabata:                 [ work 1 ] -> [ rest 1 ] -> [ work 2 ] -> ... -> Complete
//! ```
//!
//! It never looks at more than one boundary per evaluation, so a single tick
//! crosses at most one segment.

use serde::{Deserialize, Serialize};

use super::definition::{TimerDefinition, TimerKind};

/// Position inside a round-based timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalCursor {
    /// 1-based round number.
    pub round: u32,
    /// Work phase for tabata; always true for the other kinds.
    pub work: bool,
}

impl Default for IntervalCursor {
    fn default() -> Self {
        Self { round: 1, work: true }
    }
}

impl IntervalCursor {
    pub fn phase(&self) -> Phase {
        if self.work {
            Phase::Work
        } else {
            Phase::Rest
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Rest,
}

/// What the active timer should do after an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A segment boundary was reached; the next segment starts at zero.
    Rollover(IntervalCursor),
    /// The timer has finished all of its segments.
    Complete,
}

/// Decide whether the active timer crosses a boundary at `elapsed` seconds.
pub fn evaluate(timer: &TimerDefinition, cursor: IntervalCursor, elapsed: u64) -> Option<Transition> {
    let rounds = timer.rounds_or_one();
    match timer.kind {
        TimerKind::Stopwatch | TimerKind::Countdown => {
            (elapsed >= timer.duration).then_some(Transition::Complete)
        }
        TimerKind::Xy => {
            if elapsed < timer.round_time_secs() {
                return None;
            }
            if cursor.round >= rounds {
                Some(Transition::Complete)
            } else {
                Some(Transition::Rollover(IntervalCursor {
                    round: cursor.round + 1,
                    work: true,
                }))
            }
        }
        TimerKind::Tabata => {
            if cursor.work {
                (elapsed >= timer.work_time_secs()).then_some(Transition::Rollover(
                    IntervalCursor {
                        round: cursor.round,
                        work: false,
                    },
                ))
            } else if elapsed < timer.rest_time_secs() {
                None
            } else if cursor.round >= rounds {
                Some(Transition::Complete)
            } else {
                Some(Transition::Rollover(IntervalCursor {
                    round: cursor.round + 1,
                    work: true,
                }))
            }
        }
    }
}

/// Seconds shown on the clock for the active timer.
pub fn display_seconds(timer: &TimerDefinition, elapsed: u64) -> u64 {
    match timer.kind {
        TimerKind::Countdown => timer.duration.saturating_sub(elapsed),
        _ => elapsed,
    }
}

/// Length of the segment the cursor points at.
pub fn segment_length(timer: &TimerDefinition, cursor: IntervalCursor) -> u64 {
    match timer.kind {
        TimerKind::Stopwatch | TimerKind::Countdown => timer.duration,
        TimerKind::Xy => timer.round_time_secs(),
        TimerKind::Tabata if cursor.work => timer.work_time_secs(),
        TimerKind::Tabata => timer.rest_time_secs(),
    }
}
