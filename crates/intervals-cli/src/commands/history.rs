use clap::Subcommand;
use intervals_core::workout::format_compact;
use intervals_core::{Command, ValidationError, WorkoutSnapshot};

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List completed workouts, oldest first
    List,
    /// Load a completed workout's timers for another run
    Repeat {
        /// History entry id
        id: String,
    },
}

pub fn run(action: HistoryAction) -> CliResult {
    let mut session = Session::open()?;

    match action {
        HistoryAction::List => {
            let mut entries = Vec::new();
            for entry in session.store.history().list() {
                let text = format_compact(entry.total_duration);
                let mut value = serde_json::to_value(entry)?;
                if let Some(fields) = value.as_object_mut() {
                    fields.insert("totalDurationText".into(), text.into());
                }
                entries.push(value);
            }
            print_json(&entries)?;
            return Ok(());
        }
        HistoryAction::Repeat { id } => {
            let entry = session
                .store
                .history()
                .find(&id)
                .ok_or_else(|| ValidationError::NotFound {
                    collection: "history".into(),
                    id: id.clone(),
                })?;
            session.store.dispatch(Command::ResetTimerState);
            session
                .store
                .dispatch(Command::LoadState(WorkoutSnapshot::from_timers(entry.repeat_timers())));
            print_json(&session.store.timer_views())?;
        }
    }

    session.save()?;
    Ok(())
}
