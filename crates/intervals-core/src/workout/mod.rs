//! The workout state store and everything that drives it.
//!
//! ```text
//! UI ── Command ──> WorkoutStore::dispatch ──> WorkoutState
//!                        ^                         │
//!   TickDriver ── tick ──┘        Autosaver <──────┘ (snapshot)
//! ```

mod command;
mod driver;
mod state;
mod store;
mod view;

pub use command::Command;
pub use driver::{fast_forward, tick, SharedStore, TickDriver};
pub use state::{WorkoutState, WorkoutStatus};
pub use store::WorkoutStore;
pub use view::{format_clock, format_compact, TimerView};
