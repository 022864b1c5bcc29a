//! Summary statistics over price-derived samples

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Arithmetic mean of a non-empty sample
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty sample".to_string(),
        ));
    }

    Ok(values.iter().mean())
}

/// Population standard deviation of a non-empty sample
///
/// A single observation has a deviation of zero.
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the standard deviation of an empty sample".to_string(),
        ));
    }

    Ok(values.iter().population_std_dev())
}
