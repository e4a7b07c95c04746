//! # Intervals Core Library
//!
//! Core logic for the Intervals workout timer: an ordered list of timers
//! (stopwatch, countdown, XY, Tabata) run back to back, with pause, resume,
//! fast-forward, persistence and a history of finished workouts. The CLI is
//! a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer model**: definitions, duration calculator and the per-timer
//!   interval state machine
//! - **Workout store**: the single owner of workout state; every mutation is
//!   a [`Command`] passed to [`WorkoutStore::dispatch`]
//! - **Tick driver**: a one-second cooperative task that advances the clock
//! - **Storage**: a key-value port with SQLite and in-memory backends, the
//!   snapshot autosaver, the history archive and TOML configuration
//! - **Share**: URL-safe encoding of a timer list
//!
//! ## Key Components
//!
//! - [`WorkoutStore`]: reducer over [`WorkoutState`]
//! - [`TickDriver`]: periodic driver returning a cancellable [`TaskHandle`]
//! - [`KeyValueStore`]: persistence port
//! - [`HistoryArchive`]: completed-workout log

pub mod error;
pub mod events;
pub mod share;
pub mod storage;
pub mod task;
pub mod timer;
pub mod workout;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use storage::{
    Autosaver, Config, Database, HistoryArchive, KeyValueStore, MemoryStore, WorkoutHistoryEntry,
    WorkoutSnapshot,
};
pub use task::TaskHandle;
pub use timer::{TimerDefinition, TimerDraft, TimerKind, TimerState};
pub use workout::{
    Command, SharedStore, TickDriver, TimerView, WorkoutState, WorkoutStatus, WorkoutStore,
};
