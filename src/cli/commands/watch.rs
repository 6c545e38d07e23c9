//! Watch command - live countdown driven by the contest clock.

use super::Session;
use crate::cli::args::WatchArgs;
use crate::contest::{format_countdown, ContestAccessState, ContestClock, CountdownTarget, Urgency};
use crate::time::SystemClock;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Notify;

pub async fn run_watch(config: Option<PathBuf>, args: WatchArgs) -> Result<()> {
    let session = Session::open(config.as_deref())?;
    let contest = session.fetch(&args.contest).await?;
    let view = session.view(&contest)?.shared();
    let clock = ContestClock::new(SystemClock, session.config.clock.tick_interval())?;

    let done = Arc::new(Notify::new());
    let tick_done = done.clone();
    let tick_view = view.clone();
    let limit = args.ticks;
    println!("watching {} ({})", contest.name, contest.id);
    let handle = clock.start(move |tick| {
        let Some(access) = tick_view.lock().apply_tick(tick) else {
            return Ok(());
        };
        println!("{}", render_tick(&access));
        if limit.is_some_and(|max| tick.seq >= max) {
            tick_done.notify_one();
        }
        Ok(())
    });

    tokio::select! {
        _ = done.notified() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            tracing::info!("interrupted");
        }
    }
    handle.stop();
    view.lock().retire();
    tracing::info!(contest_id = %contest.id, ticks = handle.ticks(), "watch finished");
    Ok(())
}

fn render_tick(access: &ContestAccessState) -> String {
    match access.countdown_target() {
        CountdownTarget::ContestStart(secs) => format!(
            "{}  starts in {}  registration {}",
            access.contest_phase,
            format_countdown(secs as i64),
            access.registration_phase
        ),
        CountdownTarget::ContestEnd(secs) => {
            let marker = match access.urgency {
                Urgency::Critical => " [ending soon]",
                Urgency::Warning => " [under 15 minutes]",
                Urgency::Normal => "",
            };
            format!(
                "{}  {} left{}  enter: {}",
                access.contest_phase,
                format_countdown(secs as i64),
                marker,
                if access.can_enter { "yes" } else { "no" }
            )
        }
        CountdownTarget::None => format!("{}  {}", access.contest_phase, format_countdown(0)),
    }
}
