//! End-to-end analysis: bucketize, find extrema, aggregate, predict

use crate::bucket::{bucketize, normalize_series};
use crate::extremum::{analyze_buckets, MonthExtrema};
use crate::pattern::{aggregate, PatternTable};
use crate::predict::{predict, validate_horizon, PredictedMonth};
use crate::{MonthTradeError, PriceBasis, PriceRecord, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use trade_math::YearMonth;

/// Statement attached to every set of predictions
pub const PREDICTION_DISCLAIMER: &str = "Predicted dates are a deterministic heuristic: the mean \
historical position of each calendar month's lowest and highest price, scaled to the target \
month. They carry no statistical confidence bounds. Months with no history use the mid-month \
day and are flagged as fallback.";

/// Parameters of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of future months to predict; must be positive
    pub horizon: i64,
    /// Price field used to rank days
    pub basis: PriceBasis,
}

impl AnalysisConfig {
    /// Create a new analysis configuration
    pub fn new(horizon: i64, basis: PriceBasis) -> Self {
        Self { horizon, basis }
    }
}

/// Everything one analysis run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    config: AnalysisConfig,
    series: Vec<PriceRecord>,
    extrema: Vec<MonthExtrema>,
    patterns: PatternTable,
    start: YearMonth,
    predictions: Vec<PredictedMonth>,
}

impl AnalysisReport {
    /// The configuration the report was produced with
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The date-sorted, de-duplicated input series
    pub fn series(&self) -> &[PriceRecord] {
        &self.series
    }

    /// Best buy and sell point of every historical month, in order
    pub fn extrema(&self) -> &[MonthExtrema] {
        &self.extrema
    }

    /// Per-calendar-month patterns
    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// First predicted month: the month after the last historical one
    pub fn start(&self) -> YearMonth {
        self.start
    }

    /// Predicted buy and sell dates, one entry per future month
    pub fn predictions(&self) -> &[PredictedMonth] {
        &self.predictions
    }

    /// Predicted months that used the mid-month fallback
    pub fn fallback_months(&self) -> Vec<YearMonth> {
        self.predictions
            .iter()
            .filter(|m| m.is_fallback())
            .map(|m| m.period)
            .collect()
    }

    /// The limitation statement callers must pass on with the predictions
    pub fn disclaimer(&self) -> &'static str {
        PREDICTION_DISCLAIMER
    }
}

/// Run the full analysis over a daily series
///
/// The horizon is validated before any work is done. Either every stage
/// succeeds and a complete report is returned, or the first error is.
pub fn run_analysis(records: &[PriceRecord], config: &AnalysisConfig) -> Result<AnalysisReport> {
    validate_horizon(config.horizon)?;

    if records.is_empty() {
        return Err(MonthTradeError::EmptyInput);
    }
    let series = normalize_series(records);

    let buckets = bucketize(&series)?;
    let extrema = analyze_buckets(&buckets, config.basis)?;
    let patterns = aggregate(&extrema)?;

    let last = buckets
        .last()
        .map(|b| b.period())
        .ok_or(MonthTradeError::EmptyInput)?;
    let start = last.succ();

    info!(
        records = series.len(),
        months = buckets.len(),
        calendar_months = patterns.len(),
        basis = %config.basis,
        "historical analysis complete"
    );

    let predictions = predict(&patterns, start, config.horizon)?;

    info!(
        start = %start,
        horizon = config.horizon,
        fallback = predictions.iter().filter(|m| m.is_fallback()).count(),
        "predictions complete"
    );

    Ok(AnalysisReport {
        config: *config,
        series,
        extrema,
        patterns,
        start,
        predictions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, d: u32, close: f64) -> PriceRecord {
        PriceRecord::from_close(NaiveDate::from_ymd_opt(y, m, d).unwrap(), close)
    }

    #[test]
    fn test_horizon_checked_before_input() {
        let config = AnalysisConfig::new(0, PriceBasis::Close);
        assert_eq!(
            run_analysis(&[], &config),
            Err(MonthTradeError::InvalidHorizon(0))
        );
    }

    #[test]
    fn test_empty_input() {
        let config = AnalysisConfig::new(1, PriceBasis::Close);
        assert_eq!(run_analysis(&[], &config), Err(MonthTradeError::EmptyInput));
    }

    #[test]
    fn test_start_is_month_after_last_record() {
        let data = vec![record(2023, 11, 3, 1.0), record(2023, 12, 28, 2.0)];
        let report = run_analysis(&data, &AnalysisConfig::new(2, PriceBasis::Close)).unwrap();

        assert_eq!(report.start(), YearMonth::new(2024, 1).unwrap());
        assert_eq!(report.predictions().len(), 2);
        assert_eq!(report.extrema().len(), 2);
        assert_eq!(
            report.fallback_months(),
            vec![
                YearMonth::new(2024, 1).unwrap(),
                YearMonth::new(2024, 2).unwrap()
            ]
        );
        assert!(report.disclaimer().contains("no statistical confidence bounds"));
    }
}
