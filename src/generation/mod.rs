//! # Synthetic Irradiance Generation
//!
//! Three ways of turning the historical days of one (year, month, sky condition) slice into
//! an ensemble of synthetic daily profiles:
//!
//! - **Stochastic**: every slot drawn independently from a normal distribution fitted to the
//!   slot, clipped to the slot's observed range
//! - **Bootstrap**: whole historical days resampled with replacement, which keeps the
//!   intraday correlation
//! - **Sequential**: slot by slot, each draw conditioned on the days that looked like the
//!   previously generated value
//!
//! Generators never fail on an empty slice; they log it and return `Ok(None)`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use solar_synth::generation::{MonthlyAnalysis, SyntheticGenerator};
//! use solar_synth::domain::SkyCondition;
//! # fn run(series: &solar_synth::domain::ClearnessSeries) -> solar_synth::Result<()> {
//! let analysis = MonthlyAnalysis::build(series, "ghi", 2020, 1)?;
//! let mut generator = SyntheticGenerator::new(Some(42));
//! if let Some(ensemble) = generator.bootstrap(&analysis, SkyCondition::Sc3, 10)? {
//!     println!("{}: {} runs", ensemble.label(), ensemble.run_count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod bootstrap;
pub mod sequential;
pub mod stochastic;

pub use analysis::MonthlyAnalysis;
pub use bootstrap::generate_bootstrap;
pub use sequential::{generate_sequential, generate_sequential_from_profiles};
pub use stochastic::generate_stochastic;

use crate::domain::{ClearnessSeries, EnsembleSet, SkyCondition, SliceKey, SyntheticEnsemble};
use crate::error::{Result, SynthError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::info;

/// How a conditioned slot of the sequential generator is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMethod {
    /// Normal draw from the candidate values' mean and spread
    Stochastic,
    /// Uniform pick among the candidate values
    Bootstrap,
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stochastic => write!(f, "stochastic"),
            Self::Bootstrap => write!(f, "bootstrap"),
        }
    }
}

impl FromStr for SamplingMethod {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stochastic" => Ok(Self::Stochastic),
            "bootstrap" => Ok(Self::Bootstrap),
            _ => Err(SynthError::invalid_argument(format!(
                "invalid generation method '{s}', select one of stochastic, bootstrap"
            ))),
        }
    }
}

/// Selects a generator; [`Algorithm`] adds the sequential generator's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    Stochastic,
    Bootstrap,
    Sequential,
}

/// Generation algorithm with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Algorithm {
    Stochastic,
    Bootstrap,
    Sequential {
        method: SamplingMethod,
        confidence_level: f64,
    },
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stochastic => write!(f, "stochastic"),
            Self::Bootstrap => write!(f, "bootstrap"),
            Self::Sequential {
                method,
                confidence_level,
            } => write!(f, "sequential({method}, {confidence_level})"),
        }
    }
}

/// Seeded front end over the three generators.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    rng: StdRng,
}

impl SyntheticGenerator {
    /// Random seed for reproducibility (None = entropy)
    pub fn new(random_seed: Option<u64>) -> Self {
        let rng = match random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn stochastic(
        &mut self,
        analysis: &MonthlyAnalysis,
        sky_condition: SkyCondition,
        runs: usize,
    ) -> Result<Option<SyntheticEnsemble>> {
        let key = analysis.key(sky_condition)?;
        generate_stochastic(analysis.statistics(sky_condition), key, runs, &mut self.rng)
    }

    pub fn bootstrap(
        &mut self,
        analysis: &MonthlyAnalysis,
        sky_condition: SkyCondition,
        runs: usize,
    ) -> Result<Option<SyntheticEnsemble>> {
        let key = analysis.key(sky_condition)?;
        generate_bootstrap(analysis.profiles(sky_condition), key, runs, &mut self.rng)
    }

    pub fn sequential(
        &mut self,
        series: &ClearnessSeries,
        column: &str,
        key: SliceKey,
        method: SamplingMethod,
        confidence_level: f64,
        runs: usize,
    ) -> Result<Option<SyntheticEnsemble>> {
        generate_sequential(
            series,
            column,
            key,
            method,
            confidence_level,
            runs,
            &mut self.rng,
        )
    }

    /// Generates every sky condition of one month with a single analysis pass.
    ///
    /// Empty slices are left out of the result.
    pub fn generate_month(
        &mut self,
        series: &ClearnessSeries,
        column: &str,
        year: i32,
        month: u32,
        algorithm: Algorithm,
        runs: usize,
    ) -> Result<EnsembleSet> {
        let analysis = MonthlyAnalysis::build(series, column, year, month)?;
        let mut ensembles = EnsembleSet::new();

        for sky_condition in SkyCondition::iter() {
            let generated = match algorithm {
                Algorithm::Stochastic => self.stochastic(&analysis, sky_condition, runs)?,
                Algorithm::Bootstrap => self.bootstrap(&analysis, sky_condition, runs)?,
                Algorithm::Sequential {
                    method,
                    confidence_level,
                } => generate_sequential_from_profiles(
                    analysis.profiles(sky_condition),
                    analysis.key(sky_condition)?,
                    method,
                    confidence_level,
                    runs,
                    &mut self.rng,
                )?,
            };
            if let Some(ensemble) = generated {
                ensembles.insert(ensemble.key(), ensemble);
            }
        }

        info!(
            year,
            month,
            %algorithm,
            generated = ensembles.len(),
            "generated month"
        );
        Ok(ensembles)
    }
}

/// Clips a value into `[lower, upper]`.
pub(crate) fn clip(value: f64, lower: f64, upper: f64) -> f64 {
    value.max(lower).min(upper)
}

pub(crate) fn ensure_runs(runs: usize) -> Result<()> {
    if runs == 0 {
        return Err(SynthError::invalid_argument("at least one run is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeSeries;
    use chrono::NaiveDate;

    fn two_class_month() -> ClearnessSeries {
        let mut timestamps = Vec::new();
        let mut ghi = Vec::new();
        let mut kc = Vec::new();
        for day in 1..=6 {
            let date = NaiveDate::from_ymd_opt(2020, 7, day).unwrap();
            for hour in 0..24 {
                timestamps.push(date.and_hms_opt(hour, 0, 0).unwrap());
                ghi.push(((hour as f64 - 12.0).abs() * -50.0 + 600.0).max(0.0) + day as f64);
                kc.push(if day <= 3 { 0.3 } else { 0.8 });
            }
        }
        let n = timestamps.len();
        let series = TimeSeries::new(timestamps)
            .unwrap()
            .with_column("ghi", ghi)
            .unwrap();
        ClearnessSeries::new(series, vec![0.0; n], kc).unwrap()
    }

    #[test]
    fn test_sampling_method_parsing() {
        assert_eq!(
            "stochastic".parse::<SamplingMethod>().unwrap(),
            SamplingMethod::Stochastic
        );
        assert_eq!(
            "Bootstrap".parse::<SamplingMethod>().unwrap(),
            SamplingMethod::Bootstrap
        );
        assert!(matches!(
            "markov".parse::<SamplingMethod>(),
            Err(SynthError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip(5.0, 0.0, 3.0), 3.0);
        assert_eq!(clip(-1.0, 0.0, 3.0), 0.0);
        assert_eq!(clip(2.0, 0.0, 3.0), 2.0);
    }

    #[test]
    fn test_generate_month_skips_empty_classes() {
        let series = two_class_month();
        let mut generator = SyntheticGenerator::new(Some(7));

        for algorithm in [
            Algorithm::Stochastic,
            Algorithm::Bootstrap,
            Algorithm::Sequential {
                method: SamplingMethod::Bootstrap,
                confidence_level: 0.95,
            },
        ] {
            let ensembles = generator
                .generate_month(&series, "ghi", 2020, 7, algorithm, 4)
                .unwrap();

            let labels: Vec<String> = ensembles.values().map(|e| e.label()).collect();
            assert_eq!(labels, vec!["Jul2020-sc2", "Jul2020-sc5"]);
            assert!(ensembles.values().all(|e| e.run_count() == 4));
            assert!(ensembles.values().all(|e| e.slots().len() == 24));
        }
    }

    #[test]
    fn test_same_seed_same_ensemble() {
        let series = two_class_month();
        let analysis = MonthlyAnalysis::build(&series, "ghi", 2020, 7).unwrap();

        let first = SyntheticGenerator::new(Some(11))
            .stochastic(&analysis, SkyCondition::Sc5, 3)
            .unwrap();
        let second = SyntheticGenerator::new(Some(11))
            .stochastic(&analysis, SkyCondition::Sc5, 3)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_runs_rejected() {
        let series = two_class_month();
        let analysis = MonthlyAnalysis::build(&series, "ghi", 2020, 7).unwrap();
        let mut generator = SyntheticGenerator::new(Some(1));

        assert!(matches!(
            generator.bootstrap(&analysis, SkyCondition::Sc5, 0),
            Err(SynthError::InvalidArgument(_))
        ));
    }
}
