//! Sequential-conditional generation.
//!
//! A day is generated slot by slot. The value of slot `i` is drawn only from the historical
//! days whose slot `i - 1` lies within a confidence interval around the value just generated
//! for slot `i - 1`, which keeps consecutive values consistent with observed day shapes.

use super::analysis::MonthlyAnalysis;
use super::{clip, ensure_runs, SamplingMethod};
use crate::domain::{ClearnessSeries, DailyProfiles, SliceKey, SyntheticEnsemble};
use crate::error::{Result, SynthError};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use statrs::distribution::{ContinuousCDF, Normal as StandardNormal};
use statrs::statistics::Statistics;
use tracing::{debug, warn};

/// Generates the slice's sky condition for the month of `key` from a raw clearness series.
///
/// Days are classified with the series' own clearness index. Returns `Ok(None)` when no day
/// of the month matches the requested sky condition.
pub fn generate_sequential<R: Rng + ?Sized>(
    series: &ClearnessSeries,
    column: &str,
    key: SliceKey,
    method: SamplingMethod,
    confidence_level: f64,
    runs: usize,
    rng: &mut R,
) -> Result<Option<SyntheticEnsemble>> {
    validate(confidence_level, runs)?;
    let analysis = MonthlyAnalysis::build(series, column, key.year(), key.month())?;
    generate_sequential_from_profiles(
        analysis.profiles(key.sky_condition()),
        key,
        method,
        confidence_level,
        runs,
        rng,
    )
}

/// Sequential generation over an already reshaped historical matrix.
pub fn generate_sequential_from_profiles<R: Rng + ?Sized>(
    profiles: &DailyProfiles,
    key: SliceKey,
    method: SamplingMethod,
    confidence_level: f64,
    runs: usize,
    rng: &mut R,
) -> Result<Option<SyntheticEnsemble>> {
    validate(confidence_level, runs)?;

    if profiles.is_empty() {
        warn!(slice = %key, "no historical days match the slice");
        return Ok(None);
    }

    let conditioner = Conditioner::new(profiles, confidence_level)?;

    let mut ensemble = Vec::with_capacity(runs);
    for _ in 0..runs {
        ensemble.push(conditioner.generate_day(method, rng)?);
    }

    debug!(
        slice = %key,
        %method,
        confidence_level,
        runs,
        days = profiles.len(),
        "generated sequential ensemble"
    );

    Ok(Some(SyntheticEnsemble::new(key, profiles.slots(), ensemble)))
}

fn validate(confidence_level: f64, runs: usize) -> Result<()> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(SynthError::invalid_argument(format!(
            "confidence level {confidence_level} is outside (0, 1)"
        )));
    }
    ensure_runs(runs)
}

/// Historical matrix plus the per-slot quantities the conditioning step reuses.
struct Conditioner<'a> {
    profiles: &'a DailyProfiles,
    columns: Vec<Vec<f64>>,
    /// Interval half-width per slot: z * population std / sqrt(N)
    half_widths: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl<'a> Conditioner<'a> {
    fn new(profiles: &'a DailyProfiles, confidence_level: f64) -> Result<Self> {
        let alpha = 1.0 - confidence_level;
        let z = StandardNormal::new(0.0, 1.0)
            .map_err(|e| SynthError::invalid_argument(e.to_string()))?
            .inverse_cdf(confidence_level + alpha / 2.0);
        let days = profiles.len() as f64;

        let columns: Vec<Vec<f64>> = (0..profiles.resolution().slots_per_day())
            .map(|slot| profiles.column(slot))
            .collect();
        let half_widths = columns
            .iter()
            .map(|values| z * values.iter().population_std_dev() / days.sqrt())
            .collect();
        let lower = columns.iter().map(|values| minimum(values)).collect();
        let upper = columns.iter().map(|values| maximum(values)).collect();

        Ok(Self {
            profiles,
            columns,
            half_widths,
            lower,
            upper,
        })
    }

    fn generate_day<R: Rng + ?Sized>(
        &self,
        method: SamplingMethod,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        let mut day = Vec::with_capacity(self.columns.len());

        // The first slot has nothing to condition on and is not clipped
        let first = &self.columns[0];
        day.push(match method {
            SamplingMethod::Stochastic => normal(first)?.sample(rng),
            SamplingMethod::Bootstrap => pick(first, rng),
        });

        for slot in 1..self.columns.len() {
            let previous = day[slot - 1];
            let candidates = self.candidates(slot, previous);

            let value = if candidates.is_empty() {
                previous
            } else {
                match method {
                    SamplingMethod::Stochastic => clip(
                        normal(&candidates)?.sample(rng),
                        minimum(&candidates),
                        maximum(&candidates),
                    ),
                    SamplingMethod::Bootstrap => pick(&candidates, rng),
                }
            };
            day.push(value);
        }

        Ok(day)
    }

    /// Slot values of the days whose previous slot falls in the interval around `previous`.
    fn candidates(&self, slot: usize, previous: f64) -> Vec<f64> {
        let conditioning = slot - 1;
        let half_width = self.half_widths[conditioning];
        let lower = (previous - half_width).max(self.lower[conditioning]);
        let upper = (previous + half_width).min(self.upper[conditioning]);

        self.profiles
            .rows()
            .iter()
            .filter(|row| (lower..=upper).contains(&row[conditioning]))
            .map(|row| row[slot])
            .collect()
    }
}

/// Normal distribution with the population mean and standard deviation of `values`.
fn normal(values: &[f64]) -> Result<Normal<f64>> {
    let mean = values.iter().mean();
    let std = values.iter().population_std_dev();
    Normal::new(mean, std).map_err(|e| {
        SynthError::malformed_input(format!(
            "historical values give no usable distribution (mean {mean}, std {std}): {e}"
        ))
    })
}

fn pick<R: Rng + ?Sized>(values: &[f64], rng: &mut R) -> f64 {
    values[rng.gen_range(0..values.len())]
}

fn minimum(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn maximum(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
