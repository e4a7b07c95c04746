//! Workout state store.
//!
//! The store owns the single mutable [`WorkoutState`] and applies
//! [`Command`]s to it synchronously, one at a time, in dispatch order.
//!
//! ## State Transitions
//!
//! ```text
//! READY -> RUNNING <-> PAUSED
//!             |
//!             v
//!          COMPLETE -> (RESET) -> READY
//! ```

use std::fmt;

use chrono::Utc;

use super::command::Command;
use super::state::{WorkoutState, WorkoutStatus};
use super::view::TimerView;
use crate::events::Event;
use crate::storage::{HistoryArchive, WorkoutHistoryEntry, WorkoutSnapshot};
use crate::timer::{evaluate, reset_duration, TimerState, Transition};

pub struct WorkoutStore {
    state: WorkoutState,
    history: HistoryArchive,
}

impl WorkoutStore {
    /// Create a store in the default READY state with no timers.
    pub fn new(history: HistoryArchive) -> Self {
        Self {
            state: WorkoutState::default(),
            history,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &WorkoutState {
        &self.state
    }

    pub fn history(&self) -> &HistoryArchive {
        &self.history
    }

    pub fn total_duration(&self) -> u64 {
        self.state.total_duration()
    }

    pub fn snapshot(&self) -> WorkoutSnapshot {
        WorkoutSnapshot::capture(&self.state)
    }

    /// Run the interval state machine for the active timer.
    ///
    /// Returns `None` unless the workout is running and the active timer
    /// reached a segment boundary.
    pub fn evaluate_active(&self) -> Option<Transition> {
        if !self.state.is_running() {
            return None;
        }
        let timer = self.state.active_timer()?;
        evaluate(timer, self.state.cursor, self.state.elapsed_ticks)
    }

    /// Display fields for every timer, derived from the current state.
    pub fn timer_views(&self) -> Vec<TimerView> {
        (0..self.state.timers.len())
            .filter_map(|i| TimerView::derive(&self.state, i))
            .collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply one command. Never fails; contract violations are reported by
    /// `debug_assert!` and otherwise ignored.
    pub fn dispatch(&mut self, command: Command) -> Option<Event> {
        tracing::trace!(command = command.name(), "dispatch");
        let len = self.state.timers.len();
        match command {
            Command::AddTimer(timer) => {
                let unique = !self.state.timers.iter().any(|t| t.name == timer.name);
                if !self.contract(unique, format_args!("duplicate timer name '{}'", timer.name)) {
                    return None;
                }
                self.state.timers.push(timer);
                Some(self.timers_changed())
            }
            Command::RemoveTimer(index) => {
                if !self.index_contract("REMOVE_TIMER", index, len) {
                    return None;
                }
                self.state.timers.remove(index);
                self.after_remove(index);
                Some(self.timers_changed())
            }
            Command::UpdateTimer { index, timer } => {
                if !self.index_contract("UPDATE_TIMER", index, len) {
                    return None;
                }
                self.state.timers[index] = timer;
                Some(self.timers_changed())
            }
            Command::MoveTimer { from, to } => {
                if !self.index_contract("MOVE_TIMER", from, len)
                    || !self.index_contract("MOVE_TIMER", to, len)
                {
                    return None;
                }
                let active_id = self.state.active_timer().map(|t| t.id.clone());
                let moved = self.state.timers.remove(from);
                self.state.timers.insert(to, moved);
                if let Some(id) = active_id {
                    self.state.active_index = self.state.timers.iter().position(|t| t.id == id);
                }
                Some(self.timers_changed())
            }
            Command::StartTimer(index) => {
                if !self.index_contract("START_TIMER", index, len) {
                    return None;
                }
                // Timers from the start point on run again.
                for timer in &mut self.state.timers[index..] {
                    timer.state = TimerState::NotRunning;
                }
                self.state.active_index = Some(index);
                self.state.status = WorkoutStatus::Running;
                self.state.clear_segment();
                let timer = &self.state.timers[index];
                tracing::info!(index, name = %timer.name, "workout started");
                Some(Event::WorkoutStarted {
                    timer_index: index,
                    timer_kind: timer.kind,
                    at: Utc::now(),
                })
            }
            Command::ToggleTimer(status) => {
                let valid = matches!(status, WorkoutStatus::Running | WorkoutStatus::Paused)
                    && self.state.active_timer().is_some();
                if !self.contract(
                    valid,
                    format_args!("TOGGLE_TIMER to {status} while {}", self.state.status),
                ) {
                    return None;
                }
                self.state.status = status;
                Some(Event::StatusChanged {
                    status,
                    at: Utc::now(),
                })
            }
            Command::SetTime(ticks) => {
                let running = self.state.is_running();
                if !self.contract(running, format_args!("SET_TIME while {}", self.state.status)) {
                    return None;
                }
                self.state.elapsed_ticks = ticks;
                Some(Event::Ticked {
                    elapsed_secs: ticks,
                    at: Utc::now(),
                })
            }
            Command::AdvanceSegment(cursor) => {
                let ok = self.state.is_running() && self.state.active_timer().is_some();
                let Some(index) = self.state.active_index.filter(|_| ok) else {
                    self.contract(false, format_args!("ADVANCE_SEGMENT without an active timer"));
                    return None;
                };
                self.state.cursor = cursor;
                self.state.elapsed_ticks = 0;
                Some(Event::SegmentAdvanced {
                    timer_index: index,
                    cursor,
                    at: Utc::now(),
                })
            }
            Command::CompleteCurrentTimer(index) => {
                let is_active = self.state.active_index == Some(index) && index < len;
                if !self.contract(
                    is_active,
                    format_args!(
                        "COMPLETE_CURRENT_TIMER({index}) but active is {:?}",
                        self.state.active_index
                    ),
                ) {
                    return None;
                }
                self.state.timers[index].state = TimerState::Completed;
                let next = (index + 1 < len).then_some(index + 1);
                self.state.active_index = next;
                self.state.clear_segment();
                Some(Event::TimerCompleted {
                    timer_index: index,
                    timer_name: self.state.timers[index].name.clone(),
                    next_index: next,
                    at: Utc::now(),
                })
            }
            Command::CompleteAll => {
                let now = Utc::now();
                self.state.status = WorkoutStatus::Complete;
                self.state.active_index = None;
                self.state.clear_segment();

                let entry = WorkoutHistoryEntry::from_timers(&self.state.timers, now);
                let event = Event::WorkoutCompleted {
                    history_id: entry.id.clone(),
                    total_secs: entry.total_duration,
                    at: now,
                };
                tracing::info!(total_secs = entry.total_duration, "workout complete");
                if let Err(e) = self.history.append(entry) {
                    tracing::warn!("could not record workout history: {e}");
                }
                Some(event)
            }
            Command::ResetTimerState => {
                for timer in &mut self.state.timers {
                    timer.duration = reset_duration(timer);
                    timer.state = TimerState::NotRunning;
                }
                self.state.active_index = None;
                self.state.status = WorkoutStatus::Ready;
                self.state.clear_segment();
                Some(Event::WorkoutReset { at: Utc::now() })
            }
            Command::LoadState(snapshot) => {
                self.state = snapshot.into_state();
                Some(Event::StateLoaded {
                    timer_count: self.state.timers.len(),
                    status: self.state.status,
                    at: Utc::now(),
                })
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn after_remove(&mut self, removed: usize) {
        if self.state.timers.is_empty() {
            self.state.active_index = None;
            self.state.clear_segment();
            if matches!(self.state.status, WorkoutStatus::Running | WorkoutStatus::Paused) {
                self.state.status = WorkoutStatus::Ready;
            }
            return;
        }
        let Some(active) = self.state.active_index else {
            return;
        };
        if removed < active {
            self.state.active_index = Some(active - 1);
        } else if removed == active {
            // The following timer takes over from the start of its first segment.
            self.state.clear_segment();
            if active >= self.state.timers.len() {
                self.state.active_index = None;
                self.state.status = WorkoutStatus::Ready;
            }
        }
    }

    fn timers_changed(&self) -> Event {
        Event::TimersChanged {
            count: self.state.timers.len(),
            total_secs: self.state.total_duration(),
            at: Utc::now(),
        }
    }

    fn index_contract(&self, command: &str, index: usize, len: usize) -> bool {
        self.contract(
            index < len,
            format_args!("{command}: index {index} out of bounds (length: {len})"),
        )
    }

    fn contract(&self, ok: bool, violation: fmt::Arguments<'_>) -> bool {
        debug_assert!(ok, "{violation}");
        if !ok {
            tracing::warn!("ignoring invalid command: {violation}");
        }
        ok
    }
}
