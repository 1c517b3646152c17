//! Next dose countdown, adherence and dashboard statistics.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::parse_scheduled;
use crate::models::MedicationRecord;

/// Countdown to the next pending dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextDose {
    /// No pending dose with a usable time
    None,
    /// Due now or overdue
    Now,
    /// Due after the given whole hours and minutes
    In { hours: i64, minutes: i64 },
}

impl NextDose {
    /// Countdown for a signed delta. Partial minutes are dropped, so anything
    /// under a minute away is `Now`.
    pub fn from_delta(delta: Duration) -> Self {
        let total_minutes = delta.num_minutes();
        if total_minutes <= 0 {
            return NextDose::Now;
        }
        NextDose::In {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
        }
    }
}

impl fmt::Display for NextDose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextDose::None => f.write_str("None"),
            NextDose::Now => f.write_str("Now"),
            NextDose::In { hours, minutes } if *hours > 0 => {
                write!(f, "In {}h {}m", hours, minutes)
            }
            NextDose::In { minutes, .. } => write!(f, "In {}m", minutes),
        }
    }
}

/// Earliest pending dose relative to `now`.
///
/// Bare clock times are taken as today's dose.
pub fn next_dose(records: &[MedicationRecord], now: NaiveDateTime) -> NextDose {
    let today = now.date();
    records
        .iter()
        .filter(|r| r.is_pending())
        .filter_map(|r| r.time.as_deref().and_then(parse_scheduled))
        .map(|t| t.on(today))
        .min()
        .map_or(NextDose::None, |due| NextDose::from_delta(due - now))
}

/// Percentage of records taken, rounded half up. Zero for an empty list.
pub fn adherence_rate(records: &[MedicationRecord]) -> u32 {
    let total = records.len() as u64;
    if total == 0 {
        return 0;
    }
    let taken = records.iter().filter(|r| r.is_taken()).count() as u64;
    ((200 * taken + total) / (2 * total)) as u32
}

/// Number of pending records.
pub fn upcoming_count(records: &[MedicationRecord]) -> usize {
    records.iter().filter(|r| r.is_pending()).count()
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// All medications
    pub active_count: usize,
    /// Pending doses today
    pub upcoming_count: usize,
    pub next_dose: NextDose,
    /// Over all medications
    pub adherence_rate: u32,
}

impl DashboardStats {
    pub fn compute(all: &[MedicationRecord], today: &[MedicationRecord], now: NaiveDateTime) -> Self {
        Self {
            active_count: all.len(),
            upcoming_count: upcoming_count(today),
            next_dose: next_dose(today, now),
            adherence_rate: adherence_rate(all),
        }
    }
}
