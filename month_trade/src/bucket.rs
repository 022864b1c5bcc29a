//! Month bucketizer
//!
//! Partitions a daily series into one bucket per (year, month) in a single
//! pass over the date-sorted records.

use crate::{MonthTradeError, PriceRecord, Result};
use std::borrow::Cow;
use tracing::{debug, warn};
use trade_math::YearMonth;

/// The trading days of one calendar month of one year
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    period: YearMonth,
    records: Vec<PriceRecord>,
}

impl MonthBucket {
    /// Create a bucket for `period` holding `records`
    ///
    /// Records must all fall inside `period`; the bucketizer guarantees this
    /// by construction.
    pub fn new(period: YearMonth, records: Vec<PriceRecord>) -> Self {
        Self { period, records }
    }

    /// The (year, month) key of this bucket
    pub fn period(&self) -> YearMonth {
        self.period
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.period.year()
    }

    /// Calendar month number
    pub fn month(&self) -> u32 {
        self.period.month()
    }

    /// The records of this month in date order
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Number of trading days in the bucket
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the bucket has no trading days
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sort a series by date and drop repeated dates
///
/// The first record seen for a date is kept.
pub fn normalize_series(records: &[PriceRecord]) -> Vec<PriceRecord> {
    let mut sorted = records.to_vec();
    // Stable sort keeps the original order among equal dates
    sorted.sort_by_key(|r| r.date);

    let before = sorted.len();
    sorted.dedup_by_key(|r| r.date);
    let dropped = before - sorted.len();
    if dropped > 0 {
        warn!(dropped, "dropped price records with repeated dates");
    }

    sorted
}

fn is_strictly_increasing(records: &[PriceRecord]) -> bool {
    records.windows(2).all(|w| w[0].date < w[1].date)
}

/// Group a daily series into month buckets in chronological order
///
/// Every distinct (year, month) present in the input yields exactly one
/// bucket, however few trading days it holds. Input that is not strictly
/// date-ordered is normalized first.
pub fn bucketize(records: &[PriceRecord]) -> Result<Vec<MonthBucket>> {
    if records.is_empty() {
        return Err(MonthTradeError::EmptyInput);
    }

    let series: Cow<[PriceRecord]> = if is_strictly_increasing(records) {
        Cow::Borrowed(records)
    } else {
        Cow::Owned(normalize_series(records))
    };

    let mut buckets: Vec<MonthBucket> = Vec::new();
    for record in series.iter() {
        let period = YearMonth::of(record.date);
        match buckets.last_mut() {
            Some(bucket) if bucket.period == period => bucket.records.push(record.clone()),
            _ => buckets.push(MonthBucket::new(period, vec![record.clone()])),
        }
    }

    debug!(
        buckets = buckets.len(),
        records = series.len(),
        "bucketized price series"
    );

    Ok(buckets)
}
