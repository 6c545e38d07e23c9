//! Display helpers. Pure; nothing here feeds back into contest state.

use super::model::Contest;
use super::window::TimeWindow;
use crate::time::Timestamp;
use chrono::{DateTime, Utc};

const SECS_PER_HOUR: i64 = 3_600;
const MS_PER_MINUTE: u64 = 60_000;

/// A countdown reading. The terminal state is its own variant so callers
/// cannot render it as `00:00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Countdown {
    Running(String),
    TimeUp,
}

impl Countdown {
    pub fn is_time_up(&self) -> bool {
        matches!(self, Self::TimeUp)
    }
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running(text) => f.write_str(text),
            Self::TimeUp => f.write_str("Time's up"),
        }
    }
}

/// `H:MM:SS` from one hour up, `MM:SS` below; zero or negative is `TimeUp`.
pub fn format_countdown(seconds: i64) -> Countdown {
    if seconds <= 0 {
        return Countdown::TimeUp;
    }
    let hours = seconds / SECS_PER_HOUR;
    let minutes = (seconds % SECS_PER_HOUR) / 60;
    let secs = seconds % 60;
    if seconds >= SECS_PER_HOUR {
        Countdown::Running(format!("{hours}:{minutes:02}:{secs:02}"))
    } else {
        Countdown::Running(format!("{minutes:02}:{secs:02}"))
    }
}

/// Whole minutes since `timestamp`; timestamps in the future read as zero.
pub fn format_relative_time(timestamp: Timestamp, now: Timestamp) -> String {
    let minutes = now.saturating_sub(timestamp) / MS_PER_MINUTE;
    if minutes == 1 {
        "1 minute ago".to_string()
    } else {
        format!("{minutes} minutes ago")
    }
}

/// Window length as `Xh Ym`.
pub fn format_duration(window: &TimeWindow) -> String {
    let total_minutes = window.duration_ms() / MS_PER_MINUTE;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// `YYYY-MM-DD HH:MM UTC`. Out-of-range values fall back to the raw number.
pub fn format_timestamp(timestamp: Timestamp) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineKind {
    RegistrationOpens,
    RegistrationCloses,
    Starts,
    Ends,
}

impl TimelineKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RegistrationOpens => "Registration opens at",
            Self::RegistrationCloses => "Registration closes at",
            Self::Starts => "Starts at",
            Self::Ends => "Ends at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEvent {
    pub kind: TimelineKind,
    pub at: Timestamp,
}

/// Contest milestones in chronological order. Ties keep the listed order.
pub fn timeline(contest: &Contest) -> Vec<TimelineEvent> {
    let mut events = vec![
        TimelineEvent {
            kind: TimelineKind::RegistrationOpens,
            at: contest.registration_start_time,
        },
        TimelineEvent {
            kind: TimelineKind::RegistrationCloses,
            at: contest.registration_end_time,
        },
        TimelineEvent {
            kind: TimelineKind::Starts,
            at: contest.start_time,
        },
        TimelineEvent {
            kind: TimelineKind::Ends,
            at: contest.end_time,
        },
    ];
    events.sort_by_key(|event| event.at);
    events
}
