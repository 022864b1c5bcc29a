//! Monthly pattern aggregator
//!
//! Collapses the per-year extrema of each calendar month (all Januaries,
//! all Februaries, ...) into one representative position within the month.

use crate::extremum::MonthExtrema;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use trade_math::{day_position, stats};

/// Where in a calendar month the best buy and sell days tend to fall
///
/// Positions are fractions in [0, 1): `(day - 1) / days_in_month`, averaged
/// over every historical year that contains the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPattern {
    /// Calendar month number (1 = January)
    pub month: u32,
    /// Mean position of the best buy day
    pub buy_day_position: f64,
    /// Mean position of the best sell day
    pub sell_day_position: f64,
    /// Number of historical months that contributed
    pub samples: usize,
    /// Population standard deviation of the buy positions
    pub buy_dispersion: f64,
    /// Population standard deviation of the sell positions
    pub sell_dispersion: f64,
}

/// Monthly patterns keyed by calendar month number
///
/// Months with no historical occurrence have no entry; callers must decide
/// what to do about them, see [`PatternTable::missing_months`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternTable {
    patterns: BTreeMap<u32, MonthlyPattern>,
}

impl PatternTable {
    /// Pattern for a calendar month, if it appeared in the history
    pub fn get(&self, month: u32) -> Option<&MonthlyPattern> {
        self.patterns.get(&month)
    }

    /// Calendar months with no historical occurrence
    pub fn missing_months(&self) -> Vec<u32> {
        (1..=12)
            .filter(|m| !self.patterns.contains_key(m))
            .collect()
    }

    /// Patterns in calendar order
    pub fn iter(&self) -> impl Iterator<Item = &MonthlyPattern> {
        self.patterns.values()
    }

    /// Number of calendar months with a pattern
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no month has a pattern
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[derive(Default)]
struct PositionSamples {
    buy: Vec<f64>,
    sell: Vec<f64>,
}

/// Aggregate per-bucket extrema into one pattern per calendar month
pub fn aggregate(extrema: &[MonthExtrema]) -> Result<PatternTable> {
    let mut samples: BTreeMap<u32, PositionSamples> = BTreeMap::new();

    for month in extrema {
        let entry = samples.entry(month.period.month()).or_default();
        entry.buy.push(day_position(month.buy.date));
        entry.sell.push(day_position(month.sell.date));
    }

    let mut patterns = BTreeMap::new();
    for (month, positions) in samples {
        let pattern = MonthlyPattern {
            month,
            buy_day_position: stats::mean(&positions.buy)?,
            sell_day_position: stats::mean(&positions.sell)?,
            samples: positions.buy.len(),
            buy_dispersion: stats::population_std_dev(&positions.buy)?,
            sell_dispersion: stats::population_std_dev(&positions.sell)?,
        };
        debug!(
            month,
            samples = pattern.samples,
            buy = pattern.buy_day_position,
            sell = pattern.sell_day_position,
            "monthly pattern"
        );
        patterns.insert(month, pattern);
    }

    Ok(PatternTable { patterns })
}
