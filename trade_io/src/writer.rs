//! Result writers: historical extrema, predictions and run metadata

use crate::error::Result;
use chrono::NaiveDate;
use month_trade::{
    AnalysisReport, ExtremumKind, MonthExtrema, MonthlyPattern, PredictedMonth, PriceBasis,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File locations for every output of one run
///
/// Names are derived from ticker and period, e.g. `AAPL_5y_best_dates.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Raw fetched series
    pub data: PathBuf,
    /// Historical best buy/sell dates
    pub historical: PathBuf,
    /// Predicted best buy/sell dates
    pub predicted: PathBuf,
    /// Run metadata and disclaimer
    pub metadata: PathBuf,
    /// Chart
    pub chart: PathBuf,
}

impl OutputPaths {
    /// Derive output paths for `ticker` and `period` inside `dir`
    pub fn new(dir: &Path, ticker: &str, period: &str) -> Self {
        let stem = format!("{}_{}", file_component(ticker), file_component(period));
        let file = |suffix: &str| dir.join(format!("{}_{}", stem, suffix));

        Self {
            data: file("data.csv"),
            historical: file("best_dates.csv"),
            predicted: file("predicted_best_dates.csv"),
            metadata: file("prediction_meta.json"),
            chart: file("best_dates.svg"),
        }
    }
}

// Tickers such as "BRK/B" must not escape the output directory
fn file_component(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | ' ' => '_',
            c => c,
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct HistoricalRow {
    month: String,
    date: NaiveDate,
    price: f64,
    kind: ExtremumKind,
}

#[derive(Debug, Serialize)]
struct PredictedRow {
    month: String,
    date: NaiveDate,
    kind: ExtremumKind,
    is_fallback: bool,
}

/// Write historical extrema as `month,date,price,kind` rows, buy before sell
pub fn write_historical<W: Write>(writer: W, extrema: &[MonthExtrema]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for month in extrema {
        for point in month.points() {
            csv_writer.serialize(HistoricalRow {
                month: month.period.to_string(),
                date: point.date,
                price: point.price,
                kind: point.kind,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write predictions as `month,date,kind,is_fallback` rows, buy before sell
pub fn write_predictions<W: Write>(writer: W, predictions: &[PredictedMonth]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for month in predictions {
        for point in month.points() {
            csv_writer.serialize(PredictedRow {
                month: month.period.to_string(),
                date: point.date,
                kind: point.kind,
                is_fallback: point.is_fallback,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

/// Metadata stored next to the predictions
#[derive(Debug, Serialize)]
pub struct PredictionMetadata<'a> {
    pub ticker: &'a str,
    pub period: &'a str,
    pub basis: PriceBasis,
    pub horizon: i64,
    pub history_start: Option<NaiveDate>,
    pub history_end: Option<NaiveDate>,
    pub months_analyzed: usize,
    pub first_predicted_month: String,
    pub fallback_months: Vec<String>,
    pub missing_calendar_months: Vec<u32>,
    pub patterns: Vec<&'a MonthlyPattern>,
    pub disclaimer: &'static str,
}

impl<'a> PredictionMetadata<'a> {
    /// Collect the metadata of a finished analysis
    pub fn from_report(ticker: &'a str, period: &'a str, report: &'a AnalysisReport) -> Self {
        Self {
            ticker,
            period,
            basis: report.config().basis,
            horizon: report.config().horizon,
            history_start: report.series().first().map(|r| r.date),
            history_end: report.series().last().map(|r| r.date),
            months_analyzed: report.extrema().len(),
            first_predicted_month: report.start().to_string(),
            fallback_months: report
                .fallback_months()
                .iter()
                .map(|m| m.to_string())
                .collect(),
            missing_calendar_months: report.patterns().missing_months(),
            patterns: report.patterns().iter().collect(),
            disclaimer: report.disclaimer(),
        }
    }
}

/// Write run metadata as pretty-printed JSON
pub fn write_metadata<W: Write>(writer: W, metadata: &PredictionMetadata<'_>) -> Result<()> {
    serde_json::to_writer_pretty(writer, metadata)?;
    Ok(())
}

/// Write the historical, prediction and metadata files of a report
pub fn write_report(
    paths: &OutputPaths,
    ticker: &str,
    period: &str,
    report: &AnalysisReport,
) -> Result<()> {
    write_historical(
        BufWriter::new(File::create(&paths.historical)?),
        report.extrema(),
    )?;
    write_predictions(
        BufWriter::new(File::create(&paths.predicted)?),
        report.predictions(),
    )?;

    let mut meta_file = BufWriter::new(File::create(&paths.metadata)?);
    write_metadata(
        &mut meta_file,
        &PredictionMetadata::from_report(ticker, period, report),
    )?;
    meta_file.flush()?;

    Ok(())
}
