use clap::Subcommand;
use intervals_core::share::{share_query, timers_from_url};
use intervals_core::{Command, WorkoutSnapshot};

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum ShareAction {
    /// Print a link carrying the current timer list
    Encode {
        /// Page the link points at; only the query is printed when absent
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Replace the workout with the timers carried by a link
    Load {
        /// Full URL or bare `timers=...` query
        link: String,
    },
}

pub fn run(action: ShareAction) -> CliResult {
    let mut session = Session::open()?;

    match action {
        ShareAction::Encode { base_url } => {
            let query = share_query(&session.store.state().timers);
            match base_url {
                Some(base) if base.contains('?') => println!("{base}&{query}"),
                Some(base) => println!("{base}?{query}"),
                None => println!("{query}"),
            }
            // Read-only; nothing to save.
            return Ok(());
        }
        ShareAction::Load { link } => {
            let timers = timers_from_url(&link);
            if timers.is_empty() {
                return Err("link carries no timers".into());
            }
            tracing::info!(count = timers.len(), "loading shared timers");
            session
                .store
                .dispatch(Command::LoadState(WorkoutSnapshot::from_timers(timers)));
            print_json(&session.store.timer_views())?;
        }
    }

    session.save()?;
    Ok(())
}
