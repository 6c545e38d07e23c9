//! Access policy: what a viewer may do with a contest at a given instant.
//!
//! Everything here is pure. `derive` is called on every clock tick and from
//! tests with fabricated timestamps.

use super::registration::RegistrationStatus;
use super::window::{ContestPhase, TimeWindow};
use crate::time::Timestamp;
use serde::Serialize;

const CRITICAL_SECS: u64 = 5 * 60;
const WARNING_SECS: u64 = 15 * 60;

/// Everything `derive` needs besides "now".
#[derive(Debug, Clone, Copy)]
pub struct AccessInputs<'a> {
    pub registration_window: &'a TimeWindow,
    pub contest_window: &'a TimeWindow,
    pub status: &'a RegistrationStatus,
    pub authenticated: bool,
}

/// How close the running contest is to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    Warning,
    Critical,
}

impl Urgency {
    pub fn from_remaining(remaining: Option<u64>) -> Self {
        match remaining {
            Some(secs) if secs <= CRITICAL_SECS => Self::Critical,
            Some(secs) if secs <= WARNING_SECS => Self::Warning,
            _ => Self::Normal,
        }
    }
}

/// What the countdown on a contest screen should count towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTarget {
    ContestStart(u64),
    ContestEnd(u64),
    None,
}

/// UI-facing state for one (contest, viewer) pair. Rebuilt every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContestAccessState {
    pub registration_phase: ContestPhase,
    pub contest_phase: ContestPhase,
    pub can_register: bool,
    pub can_unregister: bool,
    pub can_enter: bool,
    pub seconds_to_contest_start: Option<u64>,
    pub seconds_remaining_in_contest: Option<u64>,
    pub progress_percent: f64,
    pub urgency: Urgency,
}

impl ContestAccessState {
    pub fn countdown_target(&self) -> CountdownTarget {
        match (
            self.seconds_to_contest_start,
            self.seconds_remaining_in_contest,
        ) {
            (Some(secs), _) => CountdownTarget::ContestStart(secs),
            (None, Some(secs)) => CountdownTarget::ContestEnd(secs),
            (None, None) => CountdownTarget::None,
        }
    }

    /// Problems stay viewable after the contest closes but accept no submissions.
    pub fn is_read_only(&self) -> bool {
        self.contest_phase == ContestPhase::Closed
    }
}

/// Stateless facade over [`derive`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn derive(&self, inputs: &AccessInputs<'_>, now: Timestamp) -> ContestAccessState {
        derive(inputs, now)
    }
}

pub fn derive(inputs: &AccessInputs<'_>, now: Timestamp) -> ContestAccessState {
    let registration_phase = inputs.registration_window.phase(now);
    let contest_phase = inputs.contest_window.phase(now);
    let registered = inputs.status.is_registered;
    let registration_open = registration_phase == ContestPhase::Open;

    // An existing registration survives the registration window closing.
    let can_enter = registered && contest_phase == ContestPhase::Open;
    let seconds_remaining_in_contest = inputs.contest_window.remaining(now);

    ContestAccessState {
        registration_phase,
        contest_phase,
        can_register: inputs.authenticated && registration_open && !registered,
        can_unregister: inputs.authenticated && registered && registration_open,
        can_enter,
        seconds_to_contest_start: inputs.contest_window.until(now),
        seconds_remaining_in_contest,
        progress_percent: inputs.contest_window.progress(now),
        urgency: Urgency::from_remaining(seconds_remaining_in_contest),
    }
}
