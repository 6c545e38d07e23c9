//! Contest clock: samples wall time on a fixed cadence and hands each sample
//! to a subscriber.
//!
//! The returned [`TickHandle`] owns the timer. Stopping it (explicitly or by
//! dropping it) cancels the timer task; see [`TickHandle::stop`].

use crate::time::{Clock, Timestamp};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

// Process-wide so a later `start` always carries a larger generation.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1_000);

/// One clock sample. `generation` identifies the handle that produced it and
/// grows with every `start`; `seq` starts at 1 and strictly increases per handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
    pub seq: u64,
    pub now_ms: Timestamp,
}

impl Tick {
    /// Ordering key: ticks from a newer handle supersede any from an older one.
    pub fn order(&self) -> (u64, u64) {
        (self.generation, self.seq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("tick interval must be non-zero")]
    ZeroInterval,
}

#[derive(Clone)]
pub struct ContestClock<C: Clock> {
    clock: C,
    interval: Duration,
}

impl<C: Clock> ContestClock<C> {
    pub fn new(clock: C, interval: Duration) -> Result<Self, ClockError> {
        if interval.is_zero() {
            return Err(ClockError::ZeroInterval);
        }
        Ok(Self { clock, interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the ticking task on the current tokio runtime. The first tick
    /// fires immediately.
    ///
    /// Ticks never overlap: the callback runs inline and the next tick is only
    /// awaited after it returns. An `Err` or a panic from the callback is
    /// logged and the clock keeps going.
    pub fn start<F>(&self, mut on_tick: F) -> TickHandle
    where
        F: FnMut(Tick) -> anyhow::Result<()> + Send + 'static,
    {
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        let shared = Arc::new(TickShared::default());
        let task_shared = shared.clone();
        let clock = self.clock.clone();
        let period = self.interval;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;
            loop {
                ticker.tick().await;
                if task_shared.stopped.load(Ordering::SeqCst) {
                    break;
                }
                seq += 1;
                let tick = Tick {
                    generation,
                    seq,
                    now_ms: clock.now_ms(),
                };
                task_shared.delivered.fetch_add(1, Ordering::SeqCst);
                match catch_unwind(AssertUnwindSafe(|| on_tick(tick))) {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => tracing::warn!(seq, "contest clock tick failed: {err:#}"),
                    Err(_) => tracing::warn!(seq, "contest clock tick panicked"),
                }
            }
            tracing::debug!(generation, ticks = seq, "contest clock task exited");
        });
        tracing::debug!(
            generation,
            interval_ms = period.as_millis() as u64,
            "contest clock started"
        );
        TickHandle {
            generation,
            shared,
            task,
        }
    }
}

#[derive(Default)]
struct TickShared {
    stopped: AtomicBool,
    delivered: AtomicU64,
}

/// Owned cancellation handle for a running [`ContestClock`].
pub struct TickHandle {
    generation: u64,
    shared: Arc<TickShared>,
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Cancel the timer. Idempotent and never blocks, so it is safe to call
    /// while holding a lock the callback also takes, or from the callback
    /// itself.
    ///
    /// When called from the clock's own thread (the callback, or any task on a
    /// current-thread runtime) no further callback runs. From another worker, a
    /// callback that already passed its stop check is not waited for; owners
    /// that share state with the callback also mark that state dead (see
    /// `ContestView::retire`).
    pub fn stop(&self) {
        if self.shared.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.task.abort();
        tracing::debug!(
            generation = self.generation,
            ticks = self.ticks(),
            "contest clock stopped"
        );
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::SeqCst)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of callbacks delivered so far.
    pub fn ticks(&self) -> u64 {
        self.shared.delivered.load(Ordering::SeqCst)
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickHandle")
            .field("generation", &self.generation)
            .field("stopped", &self.is_stopped())
            .field("ticks", &self.ticks())
            .finish()
    }
}
