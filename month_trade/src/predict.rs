//! Future month predictor
//!
//! Applies the monthly patterns to concrete future months. A pattern
//! position is scaled by the length of the target month; months without a
//! pattern fall back to mid-month and are flagged as such.

use crate::pattern::PatternTable;
use crate::{ExtremumKind, MonthTradeError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;
use trade_math::YearMonth;

/// A predicted best buy or best sell date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedPoint {
    /// Predicted date
    pub date: NaiveDate,
    /// Buy or sell
    pub kind: ExtremumKind,
    /// `true` when the month had no history and the mid-month default was used
    pub is_fallback: bool,
}

impl PredictedPoint {
    /// Calendar year
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar month number
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Day of the month
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// Predicted buy and sell dates of one future month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedMonth {
    /// Target month
    pub period: YearMonth,
    /// Predicted best buy date
    pub buy: PredictedPoint,
    /// Predicted best sell date
    pub sell: PredictedPoint,
}

impl PredictedMonth {
    /// Whether this month used the mid-month fallback
    pub fn is_fallback(&self) -> bool {
        self.buy.is_fallback
    }

    /// Both points, buy first
    pub fn points(&self) -> [&PredictedPoint; 2] {
        [&self.buy, &self.sell]
    }
}

/// Day of month for a pattern position: `round(position * days) + 1`,
/// clamped to `[1, days]`
pub fn day_from_position(position: f64, days: u32) -> u32 {
    let day = (position * days as f64).round() as i64 + 1;
    day.clamp(1, days as i64) as u32
}

/// Mid-month day used when a month has no history: `ceil(days / 2)`
pub fn fallback_day(days: u32) -> u32 {
    days.div_ceil(2)
}

/// Largest number of future months a single prediction may cover
pub const MAX_HORIZON: i64 = 1200;

/// Validate a requested number of future months: `1..=MAX_HORIZON`
pub fn validate_horizon(horizon: i64) -> Result<usize> {
    if !(1..=MAX_HORIZON).contains(&horizon) {
        return Err(MonthTradeError::InvalidHorizon(horizon));
    }

    usize::try_from(horizon).map_err(|_| MonthTradeError::InvalidHorizon(horizon))
}

/// Predict buy and sell dates for `horizon` consecutive months from `start`
pub fn predict(
    patterns: &PatternTable,
    start: YearMonth,
    horizon: i64,
) -> Result<Vec<PredictedMonth>> {
    let count = validate_horizon(horizon)?;

    start
        .range(count)
        .into_iter()
        .map(|period| predict_month(patterns, period))
        .collect()
}

fn predict_month(patterns: &PatternTable, period: YearMonth) -> Result<PredictedMonth> {
    let days = period.days();

    let (buy_day, sell_day, is_fallback) = match patterns.get(period.month()) {
        Some(pattern) => (
            day_from_position(pattern.buy_day_position, days),
            day_from_position(pattern.sell_day_position, days),
            false,
        ),
        None => {
            let day = fallback_day(days);
            warn!(%period, day, "no history for this calendar month, using mid-month fallback");
            (day, day, true)
        }
    };

    Ok(PredictedMonth {
        period,
        buy: PredictedPoint {
            date: period.date(buy_day)?,
            kind: ExtremumKind::Buy,
            is_fallback,
        },
        sell: PredictedPoint {
            date: period.date(sell_day)?,
            kind: ExtremumKind::Sell,
            is_fallback,
        },
    })
}
