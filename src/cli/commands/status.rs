//! Status command - one-shot access derivation for a contest.

use super::{print_json, yes_no, Session};
use crate::cli::args::StatusArgs;
use crate::contest::{
    format_countdown, format_duration, format_timestamp, timeline, Contest, ContestAccessState,
    ContestView, CountdownTarget,
};
use crate::time::{Clock, SystemClock};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct StatusReport<'a> {
    contest: &'a Contest,
    now_ms: u64,
    access: &'a ContestAccessState,
}

pub async fn run_status(config: Option<PathBuf>, args: StatusArgs) -> Result<()> {
    let session = Session::open(config.as_deref())?;
    let contest = session.fetch(&args.contest).await?;
    let view = session.view(&contest)?;
    let now = SystemClock.now_ms();
    let access = view.derive_at(now);
    if args.json {
        print_json(&StatusReport {
            contest: &contest,
            now_ms: now,
            access: &access,
        })
    } else {
        print_status(&contest, &view, &access);
        Ok(())
    }
}

fn print_status(contest: &Contest, view: &ContestView, access: &ContestAccessState) {
    println!("{} ({})", contest.name, contest.id);
    if let Some(description) = contest.description.as_deref() {
        println!("  {description}");
    }
    for event in timeline(contest) {
        println!("  {:<24} {}", event.kind.label(), format_timestamp(event.at));
    }
    if !view.windows().contest.is_instant() {
        println!("  {:<24} {}", "Duration", format_duration(&view.windows().contest));
    }
    println!();
    println!("  registration: {}", access.registration_phase);
    println!("  contest:      {}", access.contest_phase);
    println!("  registered:   {}", yes_no(view.status().is_registered));
    println!(
        "  can register: {}  can unregister: {}  can enter: {}",
        yes_no(access.can_register),
        yes_no(access.can_unregister),
        yes_no(access.can_enter)
    );
    match access.countdown_target() {
        CountdownTarget::ContestStart(secs) => {
            println!("  starts in:    {}", format_countdown(secs as i64));
        }
        CountdownTarget::ContestEnd(secs) => {
            println!(
                "  remaining:    {} ({:.0}% elapsed)",
                format_countdown(secs as i64),
                access.progress_percent
            );
        }
        CountdownTarget::None => {
            println!("  remaining:    {}", format_countdown(0));
        }
    }
    if access.is_read_only() {
        println!("  problems are read-only; submissions are closed");
    }
}
