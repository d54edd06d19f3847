//! Point error metrics between a measured and a generated series.
//!
//! Targets equal to zero are not filtered: the percentage metrics then yield `NaN` or
//! infinity and the caller decides what to drop.

use super::{ensure_same_length, MetricsError};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};
use std::fmt;

/// Root mean squared error.
///
/// With `percentage` set, the error is expressed relative to the maximum target value.
pub fn root_mean_squared_error(
    target: &[f64],
    predicted: &[f64],
    percentage: bool,
) -> Result<f64, MetricsError> {
    ensure_same_length(target, predicted)?;

    let mse = target
        .iter()
        .zip(predicted)
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / target.len() as f64;
    let rmse = mse.sqrt();

    if percentage {
        let peak = target.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(rmse / peak * 100.0)
    } else {
        Ok(rmse)
    }
}

/// Absolute error of every point as a percentage of its target.
pub fn percentage_error(target: &[f64], predicted: &[f64]) -> Result<Vec<f64>, MetricsError> {
    ensure_same_length(target, predicted)?;
    Ok(target
        .iter()
        .zip(predicted)
        .map(|(t, p)| (t - p).abs() / t * 100.0)
        .collect())
}

/// Mean absolute percentage error (%)
pub fn mean_absolute_percentage_error(
    target: &[f64],
    predicted: &[f64],
) -> Result<f64, MetricsError> {
    Ok(percentage_error(target, predicted)?.iter().mean())
}

/// Median absolute percentage error (%)
pub fn median_absolute_percentage_error(
    target: &[f64],
    predicted: &[f64],
) -> Result<f64, MetricsError> {
    let errors = percentage_error(target, predicted)?;
    if errors.iter().any(|e| e.is_nan()) {
        return Ok(f64::NAN);
    }
    Ok(Data::new(errors).median())
}

/// Error metrics of one generated series against its measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    /// Root mean squared error
    pub rmse: f64,
    /// RMSE as a percentage of the peak target
    pub normalized_rmse: f64,
    /// Mean absolute percentage error (%)
    pub mape: f64,
    /// Median absolute percentage error (%)
    pub meape: f64,
    /// Number of samples evaluated
    pub sample_count: usize,
}

impl ErrorSummary {
    /// Calculate every metric from target and predicted values
    pub fn calculate(target: &[f64], predicted: &[f64]) -> Result<Self, MetricsError> {
        Ok(Self {
            rmse: root_mean_squared_error(target, predicted, false)?,
            normalized_rmse: root_mean_squared_error(target, predicted, true)?,
            mape: mean_absolute_percentage_error(target, predicted)?,
            meape: median_absolute_percentage_error(target, predicted)?,
            sample_count: target.len(),
        })
    }
}

impl fmt::Display for ErrorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Errors: RMSE={:.3} ({:.2}%), MAPE={:.2}%, MeAPE={:.2}%, n={}",
            self.rmse, self.normalized_rmse, self.mape, self.meape, self.sample_count
        )
    }
}
