//! Tick driver.
//!
//! One tick is one second of workout time. Each tick advances the segment
//! clock, re-evaluates the active timer and issues whatever follow-up
//! commands the interval state machine asks for:
//!
//! ```text
//! SET_TIME(n+1) -> evaluate -> (ADVANCE_SEGMENT | COMPLETE_CURRENT_TIMER [-> COMPLETE_ALL])
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::command::Command;
use super::store::WorkoutStore;
use crate::events::Event;
use crate::task::{spawn_periodic, TaskHandle};
use crate::timer::Transition;

/// A store shared between the owner and its driver tasks.
pub type SharedStore = Arc<Mutex<WorkoutStore>>;

/// Advance the running workout by one second.
///
/// Does nothing unless the workout is running.
pub fn tick(store: &mut WorkoutStore) -> Vec<Event> {
    let mut events = Vec::new();
    if !store.state().is_running() {
        return events;
    }

    let next = store.state().elapsed_ticks + 1;
    events.extend(store.dispatch(Command::SetTime(next)));

    match store.evaluate_active() {
        Some(Transition::Rollover(cursor)) => {
            events.extend(store.dispatch(Command::AdvanceSegment(cursor)));
        }
        Some(Transition::Complete) => complete_active(store, &mut events),
        None => {}
    }
    events
}

/// Finish the active timer right away, as if its last segment had ended.
pub fn fast_forward(store: &mut WorkoutStore) -> Vec<Event> {
    let mut events = Vec::new();
    complete_active(store, &mut events);
    events
}

fn complete_active(store: &mut WorkoutStore, events: &mut Vec<Event>) {
    let Some(index) = store.state().active_index else {
        return;
    };
    let is_last = index + 1 == store.state().timers.len();
    events.extend(store.dispatch(Command::CompleteCurrentTimer(index)));
    if is_last {
        events.extend(store.dispatch(Command::CompleteAll));
    }
}

/// Spawns the once-per-period tick task.
pub struct TickDriver;

impl TickDriver {
    /// Tick `store` every `period` until the returned handle is cancelled.
    ///
    /// `on_tick` sees the store and the events of every tick that changed
    /// something; it runs with the store locked.
    pub fn spawn<F>(store: SharedStore, period: Duration, mut on_tick: F) -> TaskHandle
    where
        F: FnMut(&WorkoutStore, &[Event]) + Send + 'static,
    {
        spawn_periodic("tick-driver", period, move || {
            let mut guard = store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let events = tick(&mut guard);
            if !events.is_empty() {
                on_tick(&guard, &events);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{HistoryArchive, MemoryStore};
    use crate::timer::{IntervalCursor, TimerDefinition, TimerState};
    use crate::workout::WorkoutStatus;

    fn store_with(timers: Vec<TimerDefinition>) -> WorkoutStore {
        let mut store = WorkoutStore::new(HistoryArchive::new(Arc::new(MemoryStore::new())));
        for timer in timers {
            store.dispatch(Command::AddTimer(timer));
        }
        store
    }

    #[test]
    fn tick_is_a_no_op_unless_running() {
        let mut store = store_with(vec![TimerDefinition::countdown("c", 3)]);
        assert!(tick(&mut store).is_empty());
        store.dispatch(Command::StartTimer(0));
        store.dispatch(Command::ToggleTimer(WorkoutStatus::Paused));
        assert!(tick(&mut store).is_empty());
        assert_eq!(store.state().elapsed_ticks, 0);
    }

    #[test]
    fn countdown_completes_exactly_at_duration() {
        let mut store = store_with(vec![
            TimerDefinition::countdown("c", 10),
            TimerDefinition::stopwatch("s", 5),
        ]);
        store.dispatch(Command::StartTimer(0));
        for second in 1..10 {
            tick(&mut store);
            assert_eq!(store.state().elapsed_ticks, second);
            assert_eq!(store.timer_views()[0].display_seconds, 10 - second);
        }
        let events = tick(&mut store);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::TimerCompleted { timer_index: 0, .. })));
        assert_eq!(store.state().active_index, Some(1));
        assert_eq!(store.state().elapsed_ticks, 0);
    }

    #[test]
    fn tabata_phases_follow_ticks() {
        let mut store = store_with(vec![TimerDefinition::tabata("t", 2, 20, 10)]);
        store.dispatch(Command::StartTimer(0));

        for _ in 0..20 {
            tick(&mut store);
        }
        assert_eq!(store.state().cursor, IntervalCursor { round: 1, work: false });
        assert_eq!(store.state().elapsed_ticks, 0);

        for _ in 0..10 {
            tick(&mut store);
        }
        assert_eq!(store.state().cursor, IntervalCursor { round: 2, work: true });

        for _ in 0..29 {
            tick(&mut store);
        }
        assert_eq!(store.state().status, WorkoutStatus::Running);
        tick(&mut store);
        assert_eq!(store.state().status, WorkoutStatus::Complete);
        assert_eq!(store.history().list().len(), 1);
    }

    #[test]
    fn whole_workout_runs_for_its_total_duration() {
        let mut store = store_with(vec![
            TimerDefinition::countdown("Warmup", 5),
            TimerDefinition::xy("EMOM", 3, 4),
            TimerDefinition::tabata("Tabata", 2, 3, 2),
        ]);
        let total = store.total_duration();
        store.dispatch(Command::StartTimer(0));
        let mut seconds = 0;
        while store.state().status == WorkoutStatus::Running {
            tick(&mut store);
            seconds += 1;
            assert!(seconds <= total, "workout overran its total");
        }
        assert_eq!(seconds, total);
        let history = store.history().list();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].total_duration, total);
    }

    #[test]
    fn fast_forward_skips_to_next_and_finishes_on_last() {
        let mut store = store_with(vec![
            TimerDefinition::countdown("a", 60),
            TimerDefinition::xy("b", 4, 60),
        ]);
        store.dispatch(Command::StartTimer(0));
        tick(&mut store);
        fast_forward(&mut store);
        assert_eq!(store.state().active_index, Some(1));
        assert_eq!(store.state().timers[0].state, TimerState::Completed);

        let events = fast_forward(&mut store);
        assert!(matches!(events.last(), Some(Event::WorkoutCompleted { .. })));
        assert_eq!(store.state().status, WorkoutStatus::Complete);
        assert_eq!(store.timer_views()[1].current_round, Some(4));
    }

    #[test]
    fn fast_forward_without_active_timer_does_nothing() {
        let mut store = store_with(vec![TimerDefinition::countdown("a", 60)]);
        assert!(fast_forward(&mut store).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_driver_ticks_until_cancelled() {
        let store: SharedStore = Arc::new(Mutex::new(store_with(vec![TimerDefinition::countdown(
            "c", 100,
        )])));
        store.lock().unwrap().dispatch(Command::StartTimer(0));

        let handle = TickDriver::spawn(Arc::clone(&store), Duration::from_secs(1), |_, _| {});
        tokio::time::sleep(Duration::from_millis(5500)).await;
        handle.cancel().await;
        assert_eq!(store.lock().unwrap().state().elapsed_ticks, 5);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.lock().unwrap().state().elapsed_ticks, 5);
    }
}
