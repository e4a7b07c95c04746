use clap::{Args, Subcommand};
use intervals_core::{Command, Config, TimerDraft, TimerKind};
use serde_json::json;

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Append a timer to the workout
    Add {
        /// stopwatch, countdown, xy or tabata
        kind: TimerKind,
        #[command(flatten)]
        fields: TimerFields,
    },
    /// Change an existing timer
    Edit {
        /// Position in the list (0-based)
        index: usize,
        /// Switch the timer to another kind
        #[arg(long)]
        kind: Option<TimerKind>,
        #[command(flatten)]
        fields: TimerFields,
    },
    /// Remove a timer
    Remove {
        index: usize,
    },
    /// Move a timer to another position
    Move {
        from: usize,
        to: usize,
    },
    /// List timers with their derived display fields
    List,
}

/// Values left out keep the configured default (add) or current value (edit).
#[derive(Args)]
pub struct TimerFields {
    #[arg(long)]
    name: Option<String>,
    /// Seconds (stopwatch, countdown)
    #[arg(long)]
    duration: Option<u64>,
    /// Seconds per round (xy)
    #[arg(long)]
    round_time: Option<u64>,
    /// Seconds of work per round (tabata)
    #[arg(long)]
    work_time: Option<u64>,
    /// Seconds of rest per round (tabata)
    #[arg(long)]
    rest_time: Option<u64>,
    #[arg(long)]
    rounds: Option<u32>,
}

impl TimerFields {
    fn apply(self, draft: &mut TimerDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(v) = self.duration {
            draft.duration = v;
        }
        if let Some(v) = self.round_time {
            draft.round_time = v;
        }
        if let Some(v) = self.work_time {
            draft.work_time = v;
        }
        if let Some(v) = self.rest_time {
            draft.rest_time = v;
        }
        if let Some(v) = self.rounds {
            draft.rounds = v;
        }
    }
}

pub fn run(action: TimerAction) -> CliResult {
    let mut session = Session::open()?;

    match action {
        TimerAction::Add { kind, fields } => {
            let config = Config::load_or_default();
            let mut draft = TimerDraft::new(kind, &config.defaults);
            fields.apply(&mut draft);
            let timer = draft.build(&session.store.state().timers, None)?;
            print_json(&timer)?;
            session.store.dispatch(Command::AddTimer(timer));
        }
        TimerAction::Edit { index, kind, fields } => {
            session.check_index(index)?;
            let mut draft = TimerDraft::from_timer(&session.store.state().timers[index]);
            if let Some(kind) = kind {
                draft.kind = kind;
            }
            fields.apply(&mut draft);
            let timer = draft.build(&session.store.state().timers, Some(index))?;
            print_json(&timer)?;
            session.store.dispatch(Command::UpdateTimer { index, timer });
        }
        TimerAction::Remove { index } => {
            session.check_index(index)?;
            if let Some(event) = session.store.dispatch(Command::RemoveTimer(index)) {
                print_json(&event)?;
            }
        }
        TimerAction::Move { from, to } => {
            session.check_index(from)?;
            session.check_index(to)?;
            if let Some(event) = session.store.dispatch(Command::MoveTimer { from, to }) {
                print_json(&event)?;
            }
        }
        TimerAction::List => {
            print_json(&json!({
                "totalDuration": session.store.total_duration(),
                "timers": session.store.timer_views(),
            }))?;
        }
    }

    session.save()?;
    Ok(())
}
