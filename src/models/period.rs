//! Reporting period filter (year and/or month) over the match log.

use crate::models::league::LeagueError;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Optional year and month. Both `None` means all time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub year: Option<i32>,
    /// 1-12
    pub month: Option<u32>,
}

impl Period {
    pub const ALL_TIME: Period = Period {
        year: None,
        month: None,
    };

    /// Unchecked; a month outside 1-12 matches nothing.
    pub fn new(year: Option<i32>, month: Option<u32>) -> Self {
        Self { year, month }
    }

    /// Like [`Period::new`], but rejects months outside 1-12 (use for user input).
    pub fn checked(year: Option<i32>, month: Option<u32>) -> Result<Self, LeagueError> {
        match month {
            Some(m) if !(1..=12).contains(&m) => Err(LeagueError::InvalidMonth(m)),
            _ => Ok(Self::new(year, month)),
        }
    }

    pub fn year(year: i32) -> Self {
        Self::new(Some(year), None)
    }

    pub fn is_all_time(&self) -> bool {
        self.year.is_none() && self.month.is_none()
    }

    /// Whether a match played at `at` falls in this period.
    /// A month with no year means that month of `current_year`.
    pub fn contains(&self, at: DateTime<Utc>, current_year: i32) -> bool {
        match (self.year, self.month) {
            (None, None) => true,
            (Some(y), None) => at.year() == y,
            (y, Some(m)) => at.year() == y.unwrap_or(current_year) && at.month() == m,
        }
    }
}
