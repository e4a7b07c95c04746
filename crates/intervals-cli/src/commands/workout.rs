use std::future::Future;
use std::io;
use std::sync::{Arc, Mutex};

use clap::Subcommand;
use intervals_core::storage::save_snapshot;
use intervals_core::workout::{fast_forward, format_clock, tick};
use intervals_core::{
    Autosaver, Command, Config, Event, KeyValueStore, SharedStore, TickDriver, WorkoutStatus,
    WorkoutStore,
};
use serde_json::json;
use tokio::sync::mpsc;

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Start the workout at a timer
    Start {
        #[arg(default_value = "0")]
        index: usize,
    },
    /// Pause the running workout
    Pause,
    /// Resume a paused workout
    Resume,
    /// Reset every timer to its initial value
    Reset,
    /// Finish the active timer now
    Skip,
    /// Advance the running workout by whole seconds
    Tick {
        #[arg(default_value = "1")]
        seconds: u64,
    },
    /// Print the workout state as JSON
    Status,
    /// Drive the workout in real time until it completes or Ctrl-C
    Run,
}

fn status_json(store: &WorkoutStore) -> serde_json::Value {
    let state = store.state();
    json!({
        "status": state.status,
        "activeTimerIndex": state.active_index,
        "elapsed": state.elapsed_ticks,
        "totalDuration": store.total_duration(),
        "timers": store.timer_views(),
    })
}

pub fn run(action: WorkoutAction) -> CliResult {
    let mut session = Session::open()?;

    match action {
        WorkoutAction::Start { index } => {
            session.check_index(index)?;
            print_json(&session.store.dispatch(Command::StartTimer(index)))?;
        }
        WorkoutAction::Pause => {
            if session.store.state().status != WorkoutStatus::Running {
                return Err("workout is not running".into());
            }
            print_json(&session.store.dispatch(Command::ToggleTimer(WorkoutStatus::Paused)))?;
        }
        WorkoutAction::Resume => {
            if session.store.state().status != WorkoutStatus::Paused {
                return Err("workout is not paused".into());
            }
            print_json(&session.store.dispatch(Command::ToggleTimer(WorkoutStatus::Running)))?;
        }
        WorkoutAction::Reset => {
            print_json(&session.store.dispatch(Command::ResetTimerState))?;
        }
        WorkoutAction::Skip => {
            if session.store.state().active_index.is_none() {
                return Err("no active timer".into());
            }
            print_json(&fast_forward(&mut session.store))?;
        }
        WorkoutAction::Tick { seconds } => {
            if !session.store.state().is_running() {
                return Err("workout is not running".into());
            }
            let mut events = Vec::new();
            for _ in 0..seconds {
                events.extend(tick(&mut session.store));
            }
            print_json(&events)?;
        }
        WorkoutAction::Status => {
            print_json(&status_json(&session.store))?;
        }
        WorkoutAction::Run => return run_live(session),
    }

    session.save()?;
    Ok(())
}

fn run_live(mut session: Session) -> CliResult {
    prepare_run(&mut session.store)?;
    let config = Config::load_or_default();
    let Session { kv, store } = session;
    let shared: SharedStore = Arc::new(Mutex::new(store));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(Arc::clone(&shared), Arc::clone(&kv), &config));

    let store = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    print_json(&status_json(&store))?;
    save_snapshot(&store, kv.as_ref())?;
    Ok(())
}

fn prepare_run(store: &mut WorkoutStore) -> CliResult {
    match store.state().status {
        WorkoutStatus::Running => {}
        WorkoutStatus::Paused => {
            store.dispatch(Command::ToggleTimer(WorkoutStatus::Running));
        }
        WorkoutStatus::Ready if !store.state().timers.is_empty() => {
            store.dispatch(Command::StartTimer(0));
        }
        WorkoutStatus::Ready => return Err("no timers to run".into()),
        WorkoutStatus::Complete => {
            return Err("workout already complete; reset it first".into())
        }
    }
    Ok(())
}

async fn drive(store: SharedStore, kv: Arc<dyn KeyValueStore>, config: &Config) {
    let (done_tx, done_rx) = mpsc::unbounded_channel::<()>();
    let ticker = TickDriver::spawn(
        Arc::clone(&store),
        config.driver.tick_interval(),
        move |store, events| {
            for event in events {
                if let Ok(line) = serde_json::to_string(event) {
                    println!("{line}");
                }
                if matches!(event, Event::WorkoutCompleted { .. }) {
                    let _ = done_tx.send(());
                }
            }
            if let Some(view) = store.timer_views().into_iter().find(|v| v.is_active) {
                eprint!("\r{} {}   ", view.name, format_clock(view.display_seconds));
            }
        },
    );
    let saver = Autosaver::spawn(Arc::clone(&store), kv, config.driver.autosave_interval());

    match wait_for_finish(done_rx, tokio::signal::ctrl_c()).await {
        Finish::Completed => tracing::info!("workout finished"),
        Finish::Interrupted => tracing::info!("interrupted"),
    }
    eprintln!();

    ticker.cancel().await;
    saver.cancel().await;
}

#[derive(Debug, PartialEq, Eq)]
enum Finish {
    Completed,
    Interrupted,
}

/// Wait for the workout to complete or for `interrupt` to fire. If the
/// interrupt listener cannot be installed, only completion ends the wait.
async fn wait_for_finish<I>(mut done: mpsc::UnboundedReceiver<()>, interrupt: I) -> Finish
where
    I: Future<Output = io::Result<()>>,
{
    let interrupted = async {
        if let Err(e) = interrupt.await {
            tracing::warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    tokio::select! {
        _ = done.recv() => Finish::Completed,
        _ = interrupted => Finish::Interrupted,
    }
}
