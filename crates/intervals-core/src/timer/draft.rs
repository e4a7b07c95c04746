//! User input for creating or editing a timer.
//!
//! A draft is validated against its sibling timers before it becomes a
//! [`TimerDefinition`]. Rejected drafts never reach the workout store.

use serde::{Deserialize, Serialize};

use super::definition::{new_timer_id, TimerDefinition, TimerKind, TimerState};
use crate::error::ValidationError;
use crate::storage::TimerDefaults;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDraft {
    pub kind: TimerKind,
    /// Blank names are replaced with `Timer N`.
    pub name: String,
    pub duration: u64,
    pub round_time: u64,
    pub work_time: u64,
    pub rest_time: u64,
    pub rounds: u32,
}

impl TimerDraft {
    /// A draft pre-filled with the configured defaults for `kind`.
    pub fn new(kind: TimerKind, defaults: &TimerDefaults) -> Self {
        let rounds = match kind {
            TimerKind::Xy => defaults.xy_rounds,
            TimerKind::Tabata => defaults.tabata_rounds,
            TimerKind::Stopwatch | TimerKind::Countdown => 1,
        };
        Self {
            kind,
            name: String::new(),
            duration: defaults.countdown_secs,
            round_time: defaults.xy_round_secs,
            work_time: defaults.tabata_work_secs,
            rest_time: defaults.tabata_rest_secs,
            rounds,
        }
    }

    /// A draft holding the current values of an existing timer.
    pub fn from_timer(timer: &TimerDefinition) -> Self {
        Self {
            kind: timer.kind,
            name: timer.name.clone(),
            duration: timer.duration,
            round_time: timer.round_time_secs(),
            work_time: timer.work_time_secs(),
            rest_time: timer.rest_time_secs(),
            rounds: timer.rounds_or_one(),
        }
    }

    /// Check the numeric fields that matter for this kind.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.kind {
            TimerKind::Stopwatch | TimerKind::Countdown if self.duration == 0 => {
                Err(ValidationError::NonPositiveDuration)
            }
            TimerKind::Xy if self.round_time == 0 || self.rounds == 0 => {
                Err(ValidationError::InvalidXy)
            }
            TimerKind::Tabata if self.work_time == 0 || self.rest_time == 0 || self.rounds == 0 => {
                Err(ValidationError::InvalidTabata)
            }
            _ => Ok(()),
        }
    }

    /// Validate and turn the draft into a timer.
    ///
    /// `editing` is the index of the sibling being replaced; its id and
    /// creation time carry over and its own name does not count as a
    /// duplicate.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for non-positive values, a duplicate
    /// name, or an `editing` index outside `siblings`.
    pub fn build(
        self,
        siblings: &[TimerDefinition],
        editing: Option<usize>,
    ) -> Result<TimerDefinition, ValidationError> {
        self.validate()?;

        let original = match editing {
            Some(index) => Some(siblings.get(index).ok_or(ValidationError::OutOfBounds {
                collection: "timers".into(),
                index,
                len: siblings.len(),
            })?),
            None => None,
        };

        let trimmed = self.name.trim();
        let name = if trimmed.is_empty() {
            format!("Timer {}", siblings.len() + 1)
        } else {
            trimmed.to_string()
        };

        let duplicate = siblings
            .iter()
            .enumerate()
            .any(|(i, t)| t.name == name && Some(i) != editing);
        if duplicate {
            return Err(ValidationError::DuplicateName(name));
        }

        let (id, added_at) = match original {
            Some(t) => (t.id.clone(), t.added_at),
            None => (new_timer_id(), chrono::Utc::now().timestamp_millis()),
        };

        let mut timer = TimerDefinition {
            id,
            kind: self.kind,
            name,
            duration: 0,
            round_time: None,
            work_time: None,
            rest_time: None,
            rounds: None,
            state: TimerState::NotRunning,
            added_at,
        };
        match self.kind {
            TimerKind::Stopwatch | TimerKind::Countdown => timer.duration = self.duration,
            TimerKind::Xy => {
                timer.round_time = Some(self.round_time);
                timer.rounds = Some(self.rounds);
            }
            TimerKind::Tabata => {
                timer.work_time = Some(self.work_time);
                timer.rest_time = Some(self.rest_time);
                timer.rounds = Some(self.rounds);
            }
        }
        Ok(timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> TimerDefaults {
        TimerDefaults::default()
    }

    #[test]
    fn new_draft_uses_kind_defaults() {
        assert_eq!(TimerDraft::new(TimerKind::Xy, &defaults()).rounds, 3);
        assert_eq!(TimerDraft::new(TimerKind::Tabata, &defaults()).rounds, 8);
        assert_eq!(TimerDraft::new(TimerKind::Countdown, &defaults()).rounds, 1);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut draft = TimerDraft::new(TimerKind::Countdown, &defaults());
        draft.duration = 0;
        assert_eq!(draft.build(&[], None), Err(ValidationError::NonPositiveDuration));
    }

    #[test]
    fn tabata_requires_rest() {
        let mut draft = TimerDraft::new(TimerKind::Tabata, &defaults());
        draft.rest_time = 0;
        assert_eq!(draft.validate(), Err(ValidationError::InvalidTabata));
    }

    #[test]
    fn xy_requires_rounds() {
        let mut draft = TimerDraft::new(TimerKind::Xy, &defaults());
        draft.rounds = 0;
        assert_eq!(draft.validate(), Err(ValidationError::InvalidXy));
    }

    #[test]
    fn blank_name_gets_positional_default() {
        let existing = vec![TimerDefinition::countdown("Warmup", 30)];
        let mut draft = TimerDraft::new(TimerKind::Stopwatch, &defaults());
        draft.name = "   ".into();
        let timer = draft.build(&existing, None).unwrap();
        assert_eq!(timer.name, "Timer 2");
    }

    #[test]
    fn duplicate_name_is_rejected_but_editing_self_is_not() {
        let existing = vec![
            TimerDefinition::countdown("Warmup", 30),
            TimerDefinition::countdown("Sprint", 20),
        ];
        let mut draft = TimerDraft::from_timer(&existing[1]);
        draft.name = "Warmup".into();
        assert_eq!(
            draft.clone().build(&existing, None),
            Err(ValidationError::DuplicateName("Warmup".into()))
        );
        assert!(draft.clone().build(&existing, Some(1)).is_err());
        assert!(draft.build(&existing, Some(0)).is_ok());
    }

    #[test]
    fn editing_preserves_identity() {
        let existing = vec![TimerDefinition::countdown("Warmup", 30)];
        let mut draft = TimerDraft::from_timer(&existing[0]);
        draft.duration = 45;
        let edited = draft.build(&existing, Some(0)).unwrap();
        assert_eq!(edited.id, existing[0].id);
        assert_eq!(edited.added_at, existing[0].added_at);
        assert_eq!(edited.duration, 45);
    }

    #[test]
    fn only_relevant_fields_are_kept() {
        let timer = TimerDraft::new(TimerKind::Tabata, &defaults()).build(&[], None).unwrap();
        assert_eq!(timer.work_time, Some(20));
        assert_eq!(timer.rest_time, Some(10));
        assert_eq!(timer.rounds, Some(8));
        assert_eq!(timer.round_time, None);
        assert_eq!(timer.duration, 0);
    }

    #[test]
    fn editing_unknown_index_is_out_of_bounds() {
        let draft = TimerDraft::new(TimerKind::Countdown, &defaults());
        assert!(matches!(
            draft.build(&[], Some(3)),
            Err(ValidationError::OutOfBounds { index: 3, .. })
        ));
    }
}
