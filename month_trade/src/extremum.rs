//! Historical extremum analyzer
//!
//! Finds, for each month bucket, the best day to buy (lowest price) and the
//! best day to sell (highest price).

use crate::bucket::MonthBucket;
use crate::{ExtremumKind, MonthTradeError, PriceBasis, PriceRecord, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trade_math::YearMonth;

/// The best buy or best sell day of a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremumPoint {
    /// Trading date of the extremum
    pub date: NaiveDate,
    /// Price on that date under the chosen basis
    pub price: f64,
    /// Buy (minimum) or sell (maximum)
    pub kind: ExtremumKind,
}

/// Best buy and best sell point of one month bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthExtrema {
    /// The bucket the points were taken from
    pub period: YearMonth,
    /// Number of trading days in the bucket
    pub trading_days: usize,
    /// Lowest-priced day
    pub buy: ExtremumPoint,
    /// Highest-priced day
    pub sell: ExtremumPoint,
}

impl MonthExtrema {
    /// Both points, buy first
    pub fn points(&self) -> [&ExtremumPoint; 2] {
        [&self.buy, &self.sell]
    }
}

/// Find the best buy and best sell day of one bucket
///
/// Ties resolve to the earliest date: a later day only replaces the current
/// extremum when it is strictly better.
pub fn analyze_bucket(bucket: &MonthBucket, basis: PriceBasis) -> Result<MonthExtrema> {
    let (first, rest) = bucket
        .records()
        .split_first()
        .ok_or(MonthTradeError::EmptyBucket {
            year: bucket.year(),
            month: bucket.month(),
        })?;

    let mut lowest: &PriceRecord = first;
    let mut highest: &PriceRecord = first;

    for record in rest {
        if record.price(basis, ExtremumKind::Buy) < lowest.price(basis, ExtremumKind::Buy) {
            lowest = record;
        }
        if record.price(basis, ExtremumKind::Sell) > highest.price(basis, ExtremumKind::Sell) {
            highest = record;
        }
    }

    Ok(MonthExtrema {
        period: bucket.period(),
        trading_days: bucket.len(),
        buy: ExtremumPoint {
            date: lowest.date,
            price: lowest.price(basis, ExtremumKind::Buy),
            kind: ExtremumKind::Buy,
        },
        sell: ExtremumPoint {
            date: highest.date,
            price: highest.price(basis, ExtremumKind::Sell),
            kind: ExtremumKind::Sell,
        },
    })
}

/// Analyze every bucket in order
pub fn analyze_buckets(buckets: &[MonthBucket], basis: PriceBasis) -> Result<Vec<MonthExtrema>> {
    buckets
        .iter()
        .map(|bucket| {
            let extrema = analyze_bucket(bucket, basis)?;
            debug!(
                period = %extrema.period,
                buy = %extrema.buy.date,
                sell = %extrema.sell.date,
                "month extrema"
            );
            Ok(extrema)
        })
        .collect()
}
