use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four supported interval blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Stopwatch,
    Countdown,
    Xy,
    Tabata,
}

impl TimerKind {
    /// Whether the timer is driven by rounds instead of a single duration.
    pub fn is_round_based(self) -> bool {
        matches!(self, TimerKind::Xy | TimerKind::Tabata)
    }

    pub fn title(self) -> &'static str {
        match self {
            TimerKind::Stopwatch => "Stopwatch",
            TimerKind::Countdown => "Countdown Timer",
            TimerKind::Xy => "XY Timer",
            TimerKind::Tabata => "Tabata Timer",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimerKind::Stopwatch => "stopwatch",
            TimerKind::Countdown => "countdown",
            TimerKind::Xy => "xy",
            TimerKind::Tabata => "tabata",
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stopwatch" => Ok(TimerKind::Stopwatch),
            "countdown" => Ok(TimerKind::Countdown),
            "xy" => Ok(TimerKind::Xy),
            "tabata" => Ok(TimerKind::Tabata),
            other => Err(format!("unknown timer type: {other}")),
        }
    }
}

/// Per-timer display state. Derived from the workout run-state; the store
/// only writes `Completed` (and `NotRunning` on reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerState {
    #[default]
    #[serde(rename = "not running")]
    NotRunning,
    #[serde(rename = "running")]
    Running,
    #[serde(rename = "paused")]
    Paused,
    #[serde(rename = "completed")]
    Completed,
}

/// One configured interval block of a workout.
///
/// All durations are whole seconds. `duration` is the run length for
/// stopwatch/countdown; xy and tabata derive their length from
/// `round_time` or `work_time` + `rest_time` times `rounds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TimerKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    #[serde(default)]
    pub state: TimerState,
    /// Creation time in epoch milliseconds, preserved across edits.
    #[serde(default)]
    pub added_at: i64,
}

impl TimerDefinition {
    pub fn stopwatch(name: impl Into<String>, duration: u64) -> Self {
        Self::base(TimerKind::Stopwatch, name.into(), duration)
    }

    pub fn countdown(name: impl Into<String>, duration: u64) -> Self {
        Self::base(TimerKind::Countdown, name.into(), duration)
    }

    pub fn xy(name: impl Into<String>, rounds: u32, round_time: u64) -> Self {
        Self {
            round_time: Some(round_time),
            rounds: Some(rounds),
            ..Self::base(TimerKind::Xy, name.into(), 0)
        }
    }

    pub fn tabata(name: impl Into<String>, rounds: u32, work_time: u64, rest_time: u64) -> Self {
        Self {
            work_time: Some(work_time),
            rest_time: Some(rest_time),
            rounds: Some(rounds),
            ..Self::base(TimerKind::Tabata, name.into(), 0)
        }
    }

    fn base(kind: TimerKind, name: String, duration: u64) -> Self {
        Self {
            id: new_timer_id(),
            kind,
            name,
            duration,
            round_time: None,
            work_time: None,
            rest_time: None,
            rounds: None,
            state: TimerState::NotRunning,
            added_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Number of rounds, treating an absent value as a single round.
    pub fn rounds_or_one(&self) -> u32 {
        self.rounds.unwrap_or(1).max(1)
    }

    pub fn round_time_secs(&self) -> u64 {
        self.round_time.unwrap_or(0)
    }

    pub fn work_time_secs(&self) -> u64 {
        self.work_time.unwrap_or(0)
    }

    pub fn rest_time_secs(&self) -> u64 {
        self.rest_time.unwrap_or(0)
    }

    pub fn is_completed(&self) -> bool {
        self.state == TimerState::Completed
    }
}

pub(crate) fn new_timer_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Tabata".parse::<TimerKind>(), Ok(TimerKind::Tabata));
        assert_eq!(" xy ".parse::<TimerKind>(), Ok(TimerKind::Xy));
        assert!("interval".parse::<TimerKind>().is_err());
    }

    #[test]
    fn state_uses_display_labels_on_the_wire() {
        let json = serde_json::to_string(&TimerState::NotRunning).unwrap();
        assert_eq!(json, "\"not running\"");
        let parsed: TimerState = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, TimerState::Completed);
    }

    #[test]
    fn definition_serializes_camel_case_and_skips_absent_fields() {
        let timer = TimerDefinition::xy("Burpees", 3, 45);
        let value = serde_json::to_value(&timer).unwrap();
        assert_eq!(value["type"], "xy");
        assert_eq!(value["roundTime"], 45);
        assert_eq!(value["rounds"], 3);
        assert!(value.get("workTime").is_none());
        assert!(value.get("addedAt").is_some());
    }

    #[test]
    fn definition_tolerates_missing_optional_fields() {
        let timer: TimerDefinition =
            serde_json::from_str(r#"{"id":"a","type":"countdown","duration":30}"#).unwrap();
        assert_eq!(timer.state, TimerState::NotRunning);
        assert_eq!(timer.rounds_or_one(), 1);
        assert_eq!(timer.name, "");
    }

    #[test]
    fn new_timers_get_distinct_ids() {
        let a = TimerDefinition::stopwatch("A", 10);
        let b = TimerDefinition::stopwatch("B", 10);
        assert_ne!(a.id, b.id);
    }
}
