//! Evaluation metrics for synthetic irradiance
//!
//! Pure functions comparing generated ensembles with measured data:
//! variability indicators, distribution similarity tests, point error
//! metrics and an energy-yield estimate through a PV system model.

pub mod accuracy;
pub mod distribution;
pub mod energy;
pub mod variability;

pub use accuracy::{
    mean_absolute_percentage_error, median_absolute_percentage_error, percentage_error,
    root_mean_squared_error, ErrorSummary,
};
pub use distribution::{
    kolmogorov_smirnov, ks_two_sample, kullback_leibler_divergence, overlapping_coefficient,
    TwoSampleTest, DEFAULT_OVERLAP_BINS,
};
pub use energy::{
    energy_yield, ArrayLayout, DiodeModel, EnergyYield, InverterModel, InverterParameters,
    MaxPowerPoint, ModuleParameters, PvSystem,
};
pub use variability::{
    empirical_cdf, iccdf, stability_index, standard_deviation_increments, variability_index,
    DEFAULT_STABILITY_THRESHOLD,
};

/// Metric calculation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error("Dimension mismatch: target={target}, predicted={predicted}")]
    DimensionMismatch { target: usize, predicted: usize },

    #[error("Empty data provided")]
    EmptyData,

    #[error("Insufficient data: need at least {required} samples, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub(crate) fn ensure_same_length(target: &[f64], predicted: &[f64]) -> Result<(), MetricsError> {
    if target.len() != predicted.len() {
        return Err(MetricsError::DimensionMismatch {
            target: target.len(),
            predicted: predicted.len(),
        });
    }
    if target.is_empty() {
        return Err(MetricsError::EmptyData);
    }
    Ok(())
}

pub(crate) fn ensure_min_len(data: &[f64], required: usize) -> Result<(), MetricsError> {
    if data.is_empty() {
        return Err(MetricsError::EmptyData);
    }
    if data.len() < required {
        return Err(MetricsError::InsufficientData {
            required,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Absolute first differences with the first increment defined as 0.
pub(crate) fn increments(data: &[f64]) -> Vec<f64> {
    std::iter::once(0.0)
        .chain(data.windows(2).map(|w| (w[1] - w[0]).abs()))
        .take(data.len())
        .collect()
}
