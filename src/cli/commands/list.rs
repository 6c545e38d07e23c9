//! List command - one page of contests with their current phases.

use super::{print_json, yes_no, Session};
use crate::cli::args::ListArgs;
use crate::contest::{Contest, ContestPhase};
use crate::time::{Clock, SystemClock, Timestamp};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Phases of one contest at the sampled instant. `None` marks a schedule
/// whose windows do not validate.
#[derive(Debug, Serialize)]
struct ListRow<'a> {
    id: &'a str,
    name: &'a str,
    registration_phase: Option<ContestPhase>,
    contest_phase: Option<ContestPhase>,
    is_registered: bool,
}

fn summarize(contest: &Contest, now: Timestamp) -> ListRow<'_> {
    let phases = match contest.windows() {
        Ok(windows) => Some((
            windows.registration.phase(now),
            windows.contest.phase(now),
        )),
        Err(err) => {
            tracing::warn!(contest_id = %contest.id, "skipping phases for invalid schedule: {err}");
            None
        }
    };
    ListRow {
        id: &contest.id,
        name: &contest.name,
        registration_phase: phases.map(|(registration, _)| registration),
        contest_phase: phases.map(|(_, contest)| contest),
        is_registered: contest.is_registered,
    }
}

pub async fn run_list(config: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let session = Session::open(config.as_deref())?;
    let contests = session
        .api
        .list_contests(args.page)
        .await
        .with_context(|| format!("failed to list contests (page {})", args.page))?;
    let now = SystemClock.now_ms();
    let rows: Vec<ListRow<'_>> = contests.iter().map(|c| summarize(c, now)).collect();
    if args.json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("no contests on page {}", args.page);
        return Ok(());
    }
    println!(
        "{:<20} {:<32} {:<14} {:<14} {}",
        "ID", "NAME", "REGISTRATION", "CONTEST", "REGISTERED"
    );
    for row in &rows {
        println!(
            "{:<20} {:<32} {:<14} {:<14} {}",
            row.id,
            row.name,
            phase_label(row.registration_phase),
            phase_label(row.contest_phase),
            yes_no(row.is_registered)
        );
    }
    Ok(())
}

fn phase_label(phase: Option<ContestPhase>) -> String {
    phase.map_or_else(|| "invalid".to_string(), |p| p.to_string())
}
