//! # Best Days
//!
//! `best_days` finds, for every month of a stock's daily history, the day
//! with the lowest price (best day to buy) and the day with the highest
//! price (best day to sell), then projects the typical position of those
//! days onto the coming months.
//!
//! The heavy lifting lives in the member crates:
//!
//! - [`month_trade`]: bucketizing, extrema, pattern aggregation and prediction
//! - [`trade_io`]: series loaders, CSV/JSON writers and the SVG chart
//!
//! This crate wires them into a single [`run`].
//!
//! ## Example
//!
//! ```no_run
//! use best_days::{run, RunConfig};
//! use trade_io::CsvSeriesLoader;
//!
//! let config = RunConfig::new("AAPL", "5y", 3);
//! let loader = CsvSeriesLoader::new("AAPL.csv");
//! let report = run(&config, &loader).unwrap();
//! println!("first predicted month: {}", report.start());
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub use month_trade::{AnalysisConfig, AnalysisReport, MonthTradeError, PriceBasis, PriceRecord};
pub use trade_io::{CsvSeriesLoader, OutputPaths, SeriesLoader, TradeIoError, YahooChartLoader};

/// Errors of a full run
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Core(#[from] MonthTradeError),

    #[error(transparent)]
    Io(#[from] TradeIoError),
}

/// Settings of one run, usually built from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Ticker symbol passed to the loader
    pub ticker: String,
    /// Provider period such as `1y` or `5y`
    pub period: String,
    pub analysis: AnalysisConfig,
    /// Directory receiving every output file
    pub output_dir: PathBuf,
    /// Local CSV to read instead of the network
    pub input: Option<PathBuf>,
    /// Whether to render the SVG chart
    pub plot: bool,
}

impl RunConfig {
    /// Configuration with close-price basis, output in the current directory
    /// and plotting enabled
    pub fn new(ticker: &str, period: &str, horizon: i64) -> Self {
        Self {
            ticker: ticker.to_string(),
            period: period.to_string(),
            analysis: AnalysisConfig::new(horizon, PriceBasis::default()),
            output_dir: PathBuf::from("."),
            input: None,
            plot: true,
        }
    }

    /// Output file locations for this run
    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::new(&self.output_dir, &self.ticker, &self.period)
    }

    /// The loader this run reads from: the local CSV when one is given,
    /// the Yahoo chart API otherwise
    pub fn loader(&self) -> Result<Box<dyn SeriesLoader>, RunError> {
        Ok(match &self.input {
            Some(path) => Box::new(CsvSeriesLoader::new(path.clone())),
            None => Box::new(YahooChartLoader::new()?),
        })
    }
}

/// Fetch, analyse and write every output of one run
///
/// Nothing is written unless the analysis succeeds as a whole, and a
/// failing writer removes the files this run already wrote.
pub fn run(config: &RunConfig, loader: &dyn SeriesLoader) -> Result<AnalysisReport, RunError> {
    // Reject a bad horizon before touching the loader
    month_trade::predict::validate_horizon(config.analysis.horizon)?;

    info!(
        loader = loader.name(),
        ticker = %config.ticker,
        period = %config.period,
        "loading price series"
    );
    let series = loader.fetch(&config.ticker, &config.period)?;

    let report = month_trade::run_analysis(&series, &config.analysis)?;

    for month in report.predictions() {
        for point in month.points() {
            info!(
                date = %point.date,
                kind = %point.kind,
                fallback = point.is_fallback,
                "predicted best day"
            );
        }
    }

    let paths = config.output_paths();
    let mut touched = Vec::new();
    if let Err(err) = write_outputs(config, &paths, &series, &report, &mut touched) {
        discard(&touched);
        return Err(err.into());
    }

    info!(dir = %config.output_dir.display(), "outputs written");
    Ok(report)
}

/// Write every output file, recording each path before it is opened
fn write_outputs<'a>(
    config: &RunConfig,
    paths: &'a OutputPaths,
    series: &[PriceRecord],
    report: &AnalysisReport,
    touched: &mut Vec<&'a Path>,
) -> Result<(), TradeIoError> {
    std::fs::create_dir_all(&config.output_dir)?;

    touched.push(&paths.data);
    trade_io::write_series_csv(&paths.data, series)?;

    touched.extend([
        paths.historical.as_path(),
        paths.predicted.as_path(),
        paths.metadata.as_path(),
    ]);
    trade_io::write_report(paths, &config.ticker, &config.period, report)?;

    if config.plot {
        touched.push(&paths.chart);
        trade_io::render_chart(&paths.chart, &config.ticker, report)?;
    }

    Ok(())
}

// A failed run leaves none of its files behind
fn discard(paths: &[&Path]) {
    for path in paths.iter().filter(|p| p.is_file()) {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "could not remove partial output");
        }
    }
}
