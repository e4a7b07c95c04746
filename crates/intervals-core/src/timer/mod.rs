mod definition;
mod draft;
mod duration;
mod interval;

pub use definition::{TimerDefinition, TimerKind, TimerState};
pub use draft::TimerDraft;
pub use duration::{reset_duration, total_duration, total_workout_duration};
pub use interval::{display_seconds, evaluate, segment_length, IntervalCursor, Phase, Transition};
