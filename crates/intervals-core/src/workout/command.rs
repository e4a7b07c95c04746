use serde::{Deserialize, Serialize};

use super::state::WorkoutStatus;
use crate::storage::WorkoutSnapshot;
use crate::timer::{IntervalCursor, TimerDefinition};

/// The closed set of workout mutations.
///
/// Indices are a caller contract: passing one outside the timer list is a
/// programming error, not a user-facing failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    AddTimer(TimerDefinition),
    RemoveTimer(usize),
    UpdateTimer { index: usize, timer: TimerDefinition },
    MoveTimer { from: usize, to: usize },
    StartTimer(usize),
    /// Pause or resume; only `Running` and `Paused` are accepted.
    ToggleTimer(WorkoutStatus),
    SetTime(u64),
    /// Start the next segment of the active round-based timer.
    AdvanceSegment(IntervalCursor),
    CompleteCurrentTimer(usize),
    CompleteAll,
    ResetTimerState,
    LoadState(WorkoutSnapshot),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddTimer(_) => "ADD_TIMER",
            Command::RemoveTimer(_) => "REMOVE_TIMER",
            Command::UpdateTimer { .. } => "UPDATE_TIMER",
            Command::MoveTimer { .. } => "MOVE_TIMER",
            Command::StartTimer(_) => "START_TIMER",
            Command::ToggleTimer(_) => "TOGGLE_TIMER",
            Command::SetTime(_) => "SET_TIME",
            Command::AdvanceSegment(_) => "ADVANCE_SEGMENT",
            Command::CompleteCurrentTimer(_) => "COMPLETE_CURRENT_TIMER",
            Command::CompleteAll => "COMPLETE_ALL",
            Command::ResetTimerState => "RESET_TIMER_STATE",
            Command::LoadState(_) => "LOAD_STATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_use_tagged_wire_format() {
        let json = serde_json::to_value(Command::MoveTimer { from: 0, to: 2 }).unwrap();
        assert_eq!(json["type"], "MOVE_TIMER");
        assert_eq!(json["payload"]["to"], 2);

        let parsed: Command = serde_json::from_str(r#"{"type":"SET_TIME","payload":7}"#).unwrap();
        assert_eq!(parsed, Command::SetTime(7));
        assert_eq!(parsed.name(), "SET_TIME");
    }

    #[test]
    fn unknown_tags_do_not_parse() {
        let parsed = serde_json::from_str::<Command>(r#"{"type":"REWIND","payload":1}"#);
        assert!(parsed.is_err());
    }
}
