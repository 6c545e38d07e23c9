//! Wire model for contest metadata served by `GET /contests/{id}`.

use super::window::{TimeWindow, WindowError};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Contest metadata as returned by the contest backend.
///
/// Eligibility is the numeric academic-year list (`[1, 2, 3]`); the older
/// free-text `eligible_to` shape is not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub registration_start_time: Timestamp,
    pub registration_end_time: Timestamp,
    #[serde(default)]
    pub eligible_to: Vec<u8>,
    #[serde(default)]
    pub is_registered: bool,
}

/// Registration and contest windows built from one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestWindows {
    pub registration: TimeWindow,
    pub contest: TimeWindow,
}

impl Contest {
    pub fn registration_window(&self) -> Result<TimeWindow, WindowError> {
        TimeWindow::new(self.registration_start_time, self.registration_end_time)
    }

    pub fn contest_window(&self) -> Result<TimeWindow, WindowError> {
        TimeWindow::new(self.start_time, self.end_time)
    }

    pub fn windows(&self) -> Result<ContestWindows, WindowError> {
        Ok(ContestWindows {
            registration: self.registration_window()?,
            contest: self.contest_window()?,
        })
    }

    /// Whether a user in `year` may take part. An empty list admits everyone.
    pub fn is_eligible(&self, year: u8) -> bool {
        self.eligible_to.is_empty() || self.eligible_to.contains(&year)
    }
}
