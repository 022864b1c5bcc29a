//! Calendar arithmetic for month-level analysis
//!
//! Contains the helpers used to reason about trading months:
//! - `YearMonth`, a (year, month) key ordered chronologically
//! - Month lengths, including leap-year Februaries
//! - Day-of-month positions normalized to the length of the month

use crate::{MathError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month of a specific year
///
/// Ordering is chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a new year/month pair, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(MathError::InvalidInput(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }

        Ok(Self { year, month })
    }

    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month number (1 = January)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of days in this month
    pub fn days(&self) -> u32 {
        month_length(self.year, self.month)
    }

    /// The month immediately following this one
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// `count` consecutive months starting with this one
    pub fn range(&self, count: usize) -> Vec<YearMonth> {
        std::iter::successors(Some(*self), |ym| Some(ym.succ()))
            .take(count)
            .collect()
    }

    /// The date for a given day of this month
    pub fn date(&self, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or_else(|| {
            MathError::InvalidInput(format!("Day {} does not exist in {}", day, self))
        })
    }

    /// Whether a date falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

// Callers guarantee 1..=12
fn month_length(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Position of a date within its month as a fraction in [0, 1)
///
/// Computed as `(day - 1) / days_in_month`, so day 1 maps to 0.0 and the
/// last day stays strictly below 1.0. This lets days of 28- and 31-day
/// months be compared on one scale.
pub fn day_position(date: NaiveDate) -> f64 {
    let days = month_length(date.year(), date.month());
    (date.day() - 1) as f64 / days as f64
}
