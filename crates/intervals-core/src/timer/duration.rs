//! Reset and total duration calculations.
//!
//! Pure functions over a timer's type and parameters. Absent optional
//! fields count as zero seconds; an absent round count counts as one round.

use super::definition::{TimerDefinition, TimerKind};

/// Seconds a timer shows when it is reset to its not-running form.
pub fn reset_duration(timer: &TimerDefinition) -> u64 {
    match timer.kind {
        TimerKind::Xy => timer.round_time_secs(),
        TimerKind::Tabata => timer.work_time_secs(),
        TimerKind::Countdown | TimerKind::Stopwatch => timer.duration,
    }
}

/// Full run length of a single timer in seconds.
///
/// Uses saturating arithmetic so absurd inputs clamp instead of wrapping.
pub fn total_duration(timer: &TimerDefinition) -> u64 {
    let rounds = u64::from(timer.rounds_or_one());
    match timer.kind {
        TimerKind::Xy => rounds.saturating_mul(timer.round_time_secs()),
        TimerKind::Tabata => {
            rounds.saturating_mul(timer.work_time_secs().saturating_add(timer.rest_time_secs()))
        }
        TimerKind::Countdown | TimerKind::Stopwatch => timer.duration,
    }
}

/// Sum of [`total_duration`] across the sequence.
pub fn total_workout_duration(timers: &[TimerDefinition]) -> u64 {
    timers
        .iter()
        .map(total_duration)
        .fold(0u64, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn xy_total_is_rounds_times_round_time() {
        assert_eq!(total_duration(&TimerDefinition::xy("xy", 3, 45)), 135);
    }

    #[test]
    fn tabata_total_includes_rest() {
        assert_eq!(total_duration(&TimerDefinition::tabata("t", 8, 20, 10)), 240);
    }

    #[test]
    fn duration_based_totals_use_duration() {
        assert_eq!(total_duration(&TimerDefinition::countdown("c", 90)), 90);
        assert_eq!(total_duration(&TimerDefinition::stopwatch("s", 30)), 30);
    }

    #[test]
    fn reset_duration_per_kind() {
        assert_eq!(reset_duration(&TimerDefinition::xy("xy", 3, 45)), 45);
        assert_eq!(reset_duration(&TimerDefinition::tabata("t", 8, 20, 10)), 20);
        assert_eq!(reset_duration(&TimerDefinition::countdown("c", 90)), 90);
    }

    #[test]
    fn missing_round_fields_count_as_zero() {
        let mut timer = TimerDefinition::xy("xy", 3, 45);
        timer.round_time = None;
        assert_eq!(total_duration(&timer), 0);
        assert_eq!(reset_duration(&timer), 0);

        let mut tabata = TimerDefinition::tabata("t", 2, 20, 10);
        tabata.rounds = None;
        assert_eq!(total_duration(&tabata), 30);
    }

    #[test]
    fn empty_workout_is_zero() {
        assert_eq!(total_workout_duration(&[]), 0);
    }

    fn arb_timer() -> impl Strategy<Value = TimerDefinition> {
        prop_oneof![
            (0u64..10_000).prop_map(|d| TimerDefinition::stopwatch("s", d)),
            (0u64..10_000).prop_map(|d| TimerDefinition::countdown("c", d)),
            (1u32..50, 0u64..600).prop_map(|(r, t)| TimerDefinition::xy("x", r, t)),
            (1u32..50, 0u64..600, 0u64..600)
                .prop_map(|(r, w, rest)| TimerDefinition::tabata("t", r, w, rest)),
        ]
    }

    proptest! {
        #[test]
        fn workout_total_is_sum_of_timer_totals(timers in prop::collection::vec(arb_timer(), 0..12)) {
            let expected: u64 = timers.iter().map(total_duration).sum();
            prop_assert_eq!(total_workout_duration(&timers), expected);

            let mut reversed = timers.clone();
            reversed.reverse();
            prop_assert_eq!(total_workout_duration(&reversed), expected);
        }
    }
}
