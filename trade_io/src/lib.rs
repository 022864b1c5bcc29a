//! # Trade IO
//!
//! Everything around the monthly best-day analysis that touches the
//! outside world.
//!
//! ## Features
//!
//! - Series loaders: local CSV files and the Yahoo Finance chart API
//! - CSV writers for the raw series, historical extrema and predictions
//! - JSON metadata carrying the prediction disclaimer
//! - SVG charts of historical and predicted best days
//!
//! ## Quick Start
//!
//! ```no_run
//! use month_trade::{run_analysis, AnalysisConfig, PriceBasis};
//! use std::path::Path;
//! use trade_io::{render_chart, write_report, OutputPaths, SeriesLoader, YahooChartLoader};
//!
//! let loader = YahooChartLoader::new()?;
//! let series = loader.fetch("AAPL", "5y")?;
//!
//! let report = run_analysis(&series, &AnalysisConfig::new(3, PriceBasis::Close))?;
//!
//! let paths = OutputPaths::new(Path::new("."), "AAPL", "5y");
//! write_report(&paths, "AAPL", "5y", &report)?;
//! render_chart(&paths.chart, "AAPL", &report)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod data;
pub mod error;
pub mod plot;
pub mod provider;
pub mod writer;

// Re-export commonly used types
pub use crate::data::{write_series_csv, DataLoader};
pub use crate::error::TradeIoError;
pub use crate::plot::render_chart;
pub use crate::provider::{CsvSeriesLoader, SeriesLoader, YahooChartLoader};
pub use crate::writer::{write_report, OutputPaths, PredictionMetadata};
