//! Per-screen contest state: one view per (contest, viewer).
//!
//! The view glues the pieces together and enforces the ordering rules:
//! ticks are applied in `(generation, seq)` order only, and nothing (tick or
//! registration result) mutates a view after it has been retired.

use super::clock::Tick;
use super::model::{Contest, ContestWindows};
use super::policy::{derive, AccessInputs, ContestAccessState};
use super::registration::{
    GateError, GateOutcome, PendingCall, RegistrationAction, RegistrationApi, RegistrationGate,
    RegistrationStatus,
};
use super::window::WindowError;
use crate::client::ApiError;
use crate::time::Timestamp;
use parking_lot::Mutex;
use std::sync::Arc;

pub type SharedView = Arc<Mutex<ContestView>>;

#[derive(Debug)]
pub struct ContestView {
    contest_id: String,
    windows: ContestWindows,
    gate: RegistrationGate,
    authenticated: bool,
    last_generation: u64,
    last_seq: u64,
    last_now: Option<Timestamp>,
    latest: Option<ContestAccessState>,
    live: bool,
}

impl ContestView {
    pub fn new(contest: &Contest, authenticated: bool) -> Result<Self, WindowError> {
        Ok(Self {
            contest_id: contest.id.clone(),
            windows: contest.windows()?,
            gate: RegistrationGate::new(RegistrationStatus {
                is_registered: contest.is_registered,
                last_error: None,
            }),
            authenticated,
            last_generation: 0,
            last_seq: 0,
            last_now: None,
            latest: None,
            live: true,
        })
    }

    pub fn shared(self) -> SharedView {
        Arc::new(Mutex::new(self))
    }

    pub fn contest_id(&self) -> &str {
        &self.contest_id
    }

    pub fn windows(&self) -> &ContestWindows {
        &self.windows
    }

    pub fn gate(&self) -> &RegistrationGate {
        &self.gate
    }

    pub fn status(&self) -> RegistrationStatus {
        self.gate.status()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Generation of the clock handle that produced the last applied tick.
    pub fn last_generation(&self) -> u64 {
        self.last_generation
    }

    pub fn latest(&self) -> Option<&ContestAccessState> {
        self.latest.as_ref()
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
        self.rederive();
    }

    /// Derive without recording anything.
    pub fn derive_at(&self, now: Timestamp) -> ContestAccessState {
        let status = self.gate.status();
        derive(
            &AccessInputs {
                registration_window: &self.windows.registration,
                contest_window: &self.windows.contest,
                status: &status,
                authenticated: self.authenticated,
            },
            now,
        )
    }

    /// Apply a clock sample. Returns `None` when the tick is stale (not newer
    /// than the last applied one by `(generation, seq)`) or the view has been
    /// retired. A restarted clock has a larger generation, so its first tick
    /// is applied even though its `seq` starts over.
    pub fn apply_tick(&mut self, tick: Tick) -> Option<ContestAccessState> {
        if !self.live {
            return None;
        }
        if tick.order() <= (self.last_generation, self.last_seq) {
            tracing::trace!(
                generation = tick.generation,
                seq = tick.seq,
                last_generation = self.last_generation,
                last_seq = self.last_seq,
                "dropping superseded tick"
            );
            return None;
        }
        let state = self.derive_at(tick.now_ms);
        self.last_generation = tick.generation;
        self.last_seq = tick.seq;
        self.last_now = Some(tick.now_ms);
        self.latest = Some(state.clone());
        Some(state)
    }

    /// Replace windows and registration flag with a fresh server copy.
    pub fn refresh(&mut self, contest: &Contest) -> Result<(), WindowError> {
        if !self.live {
            return Ok(());
        }
        self.windows = contest.windows()?;
        self.gate.refresh(contest.is_registered);
        self.rederive();
        Ok(())
    }

    /// Re-check permission at `now` and mark the gate pending.
    pub fn begin_registration(
        &mut self,
        action: RegistrationAction,
        now: Timestamp,
    ) -> Result<PendingCall, GateError> {
        if !self.live {
            return Err(GateError::NotPermitted(action.as_str()));
        }
        let access = self.derive_at(now);
        let call = self.gate.begin(&self.contest_id, action, &access)?;
        self.rederive();
        Ok(call)
    }

    /// Apply a registration result. Results for a retired view are discarded
    /// and `None` is returned.
    pub fn complete_registration(
        &mut self,
        call: PendingCall,
        result: Result<(), ApiError>,
    ) -> Option<Result<GateOutcome, GateError>> {
        if !self.live {
            tracing::debug!(
                contest_id = %call.contest_id,
                "discarding registration result for retired view"
            );
            return None;
        }
        let outcome = self.gate.complete(call, result);
        self.rederive();
        Some(outcome)
    }

    pub fn acknowledge(&mut self) -> bool {
        self.gate.acknowledge()
    }

    /// Tear down: no further ticks or results are applied.
    pub fn retire(&mut self) {
        self.live = false;
    }

    // Recompute `latest` at the last sampled instant after a status change.
    fn rederive(&mut self) {
        if let Some(now) = self.last_now {
            self.latest = Some(self.derive_at(now));
        }
    }
}

/// Run one registration action against a shared view without holding its
/// lock across the network call. `None` means the view was retired while the
/// request was in flight and the result was dropped.
pub async fn run_registration<A: RegistrationApi>(
    view: &SharedView,
    api: &A,
    action: RegistrationAction,
    now: Timestamp,
) -> Option<Result<GateOutcome, GateError>> {
    let call = match view.lock().begin_registration(action, now) {
        Ok(call) => call,
        Err(err) => return Some(Err(err)),
    };
    let result = api.submit(&call.contest_id, call.action).await;
    view.lock().complete_registration(call, result)
}
