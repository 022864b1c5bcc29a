//! # Month Trade
//!
//! `month_trade` finds the historically best day of each month to buy
//! (lowest price) and to sell (highest price) in a daily OHLCV series, and
//! projects those days onto future months.
//!
//! ## Pipeline
//!
//! - **Bucketizer** ([`bucket`]): splits the series into one bucket per (year, month)
//! - **Extremum analyzer** ([`extremum`]): best buy and best sell point per bucket
//! - **Pattern aggregator** ([`pattern`]): mean day-of-month position per calendar month
//! - **Predictor** ([`predict`]): predicted buy and sell dates for future months
//!
//! The predictions are a deterministic heuristic. They carry no confidence
//! bounds, and months that never appear in the history fall back to the
//! middle of the month.
//!
//! ## Usage Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use month_trade::utils::generate_test_data;
//! use month_trade::{run_analysis, AnalysisConfig, PriceBasis};
//!
//! let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
//! let data = generate_test_data(start, 500, 100.0, 0.02);
//!
//! let config = AnalysisConfig::new(3, PriceBasis::Close);
//! let report = run_analysis(&data, &config).unwrap();
//!
//! for month in report.predictions() {
//!     println!("{}: buy {} sell {}", month.period, month.buy.date, month.sell.date);
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use trade_math::MathError;

pub mod bucket;
pub mod extremum;
pub mod pattern;
pub mod pipeline;
pub mod predict;
// Synthetic series generation
pub mod utils;

pub use bucket::{bucketize, normalize_series, MonthBucket};
pub use extremum::{analyze_bucket, analyze_buckets, ExtremumPoint, MonthExtrema};
pub use pattern::{aggregate, MonthlyPattern, PatternTable};
pub use pipeline::{run_analysis, AnalysisConfig, AnalysisReport, PREDICTION_DISCLAIMER};
pub use predict::{predict, PredictedMonth, PredictedPoint, MAX_HORIZON};
pub use trade_math::YearMonth;

/// Errors that can occur while analysing a price series
///
/// Every message names the pipeline stage that raised it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MonthTradeError {
    #[error("bucketizer: no historical price records supplied")]
    EmptyInput,

    #[error("extremum analyzer: bucket {year:04}-{month:02} has no records")]
    EmptyBucket { year: i32, month: u32 },

    #[error("predictor: horizon must be a positive number of months, at most 1200, got {0}")]
    InvalidHorizon(i64),

    #[error("calendar error: {0}")]
    Calendar(#[from] MathError),
}

/// Result type for month analysis operations
pub type Result<T> = std::result::Result<T, MonthTradeError>;

/// Represents OHLCV (Open, High, Low, Close, Volume) data for one trading day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvData {
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume
    pub volume: u64,
}

/// A single daily price record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Trading date
    pub date: NaiveDate,
    /// OHLCV data
    pub data: OhlcvData,
}

impl PriceRecord {
    /// Create a record from a full set of OHLCV values
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            data: OhlcvData {
                open,
                high,
                low,
                close,
                volume,
            },
        }
    }

    /// Create a record where only the close is known
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self::new(date, close, close, close, close, 0)
    }

    /// Closing price
    pub fn close(&self) -> f64 {
        self.data.close
    }

    /// The price used to rank this day for the given side of the trade
    pub fn price(&self, basis: PriceBasis, kind: ExtremumKind) -> f64 {
        match (basis, kind) {
            (PriceBasis::Close, _) => self.data.close,
            (PriceBasis::Open, _) => self.data.open,
            (PriceBasis::Intraday, ExtremumKind::Buy) => self.data.low,
            (PriceBasis::Intraday, ExtremumKind::Sell) => self.data.high,
        }
    }
}

/// Which side of the trade an extremum or prediction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExtremumKind {
    /// Lowest price of the month
    Buy,
    /// Highest price of the month
    Sell,
}

impl fmt::Display for ExtremumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtremumKind::Buy => write!(f, "BUY"),
            ExtremumKind::Sell => write!(f, "SELL"),
        }
    }
}

/// Which price field ranks the days of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBasis {
    /// Closing price for both buy and sell
    #[default]
    Close,
    /// Opening price for both buy and sell
    Open,
    /// Daily low for buy, daily high for sell
    Intraday,
}

impl fmt::Display for PriceBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceBasis::Close => write!(f, "close"),
            PriceBasis::Open => write!(f, "open"),
            PriceBasis::Intraday => write!(f, "intraday"),
        }
    }
}

impl FromStr for PriceBasis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "close" => Ok(PriceBasis::Close),
            "open" => Ok(PriceBasis::Open),
            "intraday" | "low-high" => Ok(PriceBasis::Intraday),
            other => Err(format!(
                "invalid price basis '{}'. expected one of: close | open | intraday",
                other
            )),
        }
    }
}
