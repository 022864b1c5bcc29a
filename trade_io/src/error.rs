//! Error types for the trade_io crate

use thiserror::Error;

/// Errors raised while loading price series or writing results
#[derive(Debug, Error)]
pub enum TradeIoError {
    /// The series could not be obtained for this ticker and period
    #[error("series loader: data unavailable for '{ticker}' over '{period}': {reason}")]
    DataUnavailable {
        ticker: String,
        period: String,
        reason: String,
    },

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON encoding or decoding
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from chart rendering
    #[error("Plot error: {0}")]
    PlotError(String),
}

impl TradeIoError {
    /// Build a `DataUnavailable` error
    pub fn unavailable(ticker: &str, period: &str, reason: impl Into<String>) -> Self {
        TradeIoError::DataUnavailable {
            ticker: ticker.to_string(),
            period: period.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, TradeIoError>;
