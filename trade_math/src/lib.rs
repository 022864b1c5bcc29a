//! # Trade Math
//!
//! Mathematical helpers for month-level price analysis.
//! This crate provides the calendar arithmetic used to compare trading
//! days across months of different lengths, and the summary statistics
//! used to aggregate those positions across years.

use thiserror::Error;

pub mod calendar;
pub mod stats;

pub use calendar::{day_position, YearMonth};

/// Errors that can occur in trading-related calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for trading math operations
pub type Result<T> = std::result::Result<T, MathError>;
