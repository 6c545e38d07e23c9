//! Closed time intervals and the phase of "now" relative to them.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MS_PER_SEC: u64 = 1_000;

/// Temporal relationship of "now" to a [`TimeWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestPhase {
    Upcoming,
    Open,
    Closed,
}

impl ContestPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ContestPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("invalid window: end {end} precedes start {start}")]
    InvalidWindow { start: Timestamp, end: Timestamp },
}

/// Inclusive `[start, end]` interval in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    start: Timestamp,
    end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, WindowError> {
        if end < start {
            return Err(WindowError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn duration_ms(&self) -> u64 {
        self.end - self.start
    }

    /// Zero-length window; open for the single millisecond `start == end`.
    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, now: Timestamp) -> bool {
        self.start <= now && now <= self.end
    }

    pub fn phase(&self, now: Timestamp) -> ContestPhase {
        if now < self.start {
            ContestPhase::Upcoming
        } else if now > self.end {
            ContestPhase::Closed
        } else {
            ContestPhase::Open
        }
    }

    /// Whole seconds left until `end`, floored. `None` unless open.
    pub fn remaining(&self, now: Timestamp) -> Option<u64> {
        match self.phase(now) {
            ContestPhase::Open => Some(self.end.saturating_sub(now) / MS_PER_SEC),
            _ => None,
        }
    }

    /// Whole seconds until `start`, rounded up so the countdown never shows
    /// zero while still upcoming. `None` unless upcoming.
    pub fn until(&self, now: Timestamp) -> Option<u64> {
        match self.phase(now) {
            ContestPhase::Upcoming => Some(self.start.saturating_sub(now).div_ceil(MS_PER_SEC)),
            _ => None,
        }
    }

    /// Elapsed share of the window in percent, clamped to `0.0..=100.0`.
    pub fn progress(&self, now: Timestamp) -> f64 {
        match self.phase(now) {
            ContestPhase::Upcoming => 0.0,
            ContestPhase::Closed => 100.0,
            ContestPhase::Open if self.is_instant() => 100.0,
            ContestPhase::Open => {
                let elapsed = (now - self.start) as f64;
                (elapsed / self.duration_ms() as f64 * 100.0).clamp(0.0, 100.0)
            }
        }
    }
}

impl<'de> Deserialize<'de> for TimeWindow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: Timestamp,
            end: Timestamp,
        }
        let raw = Raw::deserialize(deserializer)?;
        TimeWindow::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}
