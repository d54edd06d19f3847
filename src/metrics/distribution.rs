//! Similarity between the distribution of two samples.

use super::MetricsError;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Number of equal-width bins used by the overlapping coefficient
pub const DEFAULT_OVERLAP_BINS: usize = 100;

/// Result of a two-sample test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwoSampleTest {
    pub statistic: f64,
    pub p_value: f64,
}

/// Largest `n·m` for which the exact p-value is computed
pub const KS_EXACT_MAX_CELLS: usize = 10_000_000;

/// Two-sided two-sample Kolmogorov-Smirnov test.
///
/// The statistic is the largest distance between the two empirical CDFs. Up to
/// [`KS_EXACT_MAX_CELLS`] the p-value is exact, from the lattice paths that stay closer than
/// the statistic to the diagonal. Larger samples use the asymptotic Kolmogorov distribution
/// with effective size `n·m / (n + m)` and Stephens' small-sample correction.
pub fn ks_two_sample(sample1: &[f64], sample2: &[f64]) -> Result<TwoSampleTest, MetricsError> {
    let a = sorted(sample1)?;
    let b = sorted(sample2)?;
    let (n, m) = (a.len() as f64, b.len() as f64);

    let mut statistic: f64 = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        statistic = statistic.max((i as f64 / n - j as f64 / m).abs());
    }

    let p_value = if a.len() * b.len() <= KS_EXACT_MAX_CELLS {
        exact_p_value(a.len(), b.len(), statistic)
    } else {
        let effective = (n * m / (n + m)).sqrt();
        let lambda = (effective + 0.12 + 0.11 / effective) * statistic;
        kolmogorov_survival(lambda)
    };

    Ok(TwoSampleTest {
        statistic,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// p-value of the two-sample Kolmogorov-Smirnov test.
///
/// Below 0.05 the samples are unlikely to come from the same distribution.
pub fn kolmogorov_smirnov(sample1: &[f64], sample2: &[f64]) -> Result<f64, MetricsError> {
    Ok(ks_two_sample(sample1, sample2)?.p_value)
}

/// Kullback-Leibler divergence `D(p || q)` between two discrete distributions.
///
/// Both inputs are normalised to sum to 1. An infinite divergence (mass in `p` where `q` has
/// none) is reported as 1.
pub fn kullback_leibler_divergence(p: &[f64], q: &[f64]) -> Result<f64, MetricsError> {
    super::ensure_same_length(p, q)?;
    let p_total = total_mass(p)?;
    let q_total = total_mass(q)?;

    let divergence: f64 = p
        .iter()
        .zip(q)
        .map(|(pi, qi)| {
            let (pi, qi) = (pi / p_total, qi / q_total);
            if pi == 0.0 {
                0.0
            } else if qi == 0.0 {
                f64::INFINITY
            } else {
                pi * (pi / qi).ln()
            }
        })
        .sum();

    if divergence.is_finite() {
        Ok(divergence)
    } else {
        Ok(1.0)
    }
}

/// Overlapping coefficient of two samples.
///
/// The combined value range is split into `bins` equal-width bins, the last one closed.
/// The result is the sum over bins of the smaller relative frequency: 1 for identical
/// samples, 0 for disjoint ones.
pub fn overlapping_coefficient(
    sample1: &[f64],
    sample2: &[f64],
    bins: usize,
) -> Result<f64, MetricsError> {
    if bins == 0 {
        return Err(MetricsError::InvalidInput("at least one bin is required".to_string()));
    }
    let a = sorted(sample1)?;
    let b = sorted(sample2)?;

    let min = a[0].min(b[0]);
    let max = a[a.len() - 1].max(b[b.len() - 1]);
    if max == min {
        return Ok(1.0);
    }
    let width = (max - min) / bins as f64;

    let histogram = |values: &[f64]| -> Vec<f64> {
        let mut counts = vec![0usize; bins];
        for v in values {
            let bin = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[bin] += 1;
        }
        counts
            .into_iter()
            .map(|c| c as f64 / values.len() as f64)
            .collect()
    };

    let overlap = histogram(&a)
        .into_iter()
        .zip(histogram(&b))
        .map(|(fa, fb)| fa.min(fb))
        .sum::<f64>();

    Ok(overlap.clamp(0.0, 1.0))
}

fn sorted(sample: &[f64]) -> Result<Vec<f64>, MetricsError> {
    if sample.is_empty() {
        return Err(MetricsError::EmptyData);
    }
    if sample.iter().any(|v| v.is_nan()) {
        return Err(MetricsError::InvalidInput("sample contains NaN".to_string()));
    }
    let mut values = sample.to_vec();
    values.sort_by_key(|v| OrderedFloat(*v));
    Ok(values)
}

fn total_mass(distribution: &[f64]) -> Result<f64, MetricsError> {
    if distribution.iter().any(|v| !(*v >= 0.0)) {
        return Err(MetricsError::InvalidInput(
            "distribution has negative or NaN mass".to_string(),
        ));
    }
    let total: f64 = distribution.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(MetricsError::InvalidInput(format!(
            "distribution total mass {total} cannot be normalised"
        )));
    }
    Ok(total)
}

/// `P(D >= statistic)` under the null hypothesis, for samples of sizes `n` and `m`.
///
/// A uniformly random monotone path from `(0, 0)` to `(n, m)` is walked as a Markov chain.
/// Probability mass reaching a point where `|i/n - j/m| >= statistic` is dropped; what
/// arrives at `(n, m)` is the probability of staying inside.
fn exact_p_value(n: usize, m: usize, statistic: f64) -> f64 {
    let g = gcd(n, m);
    let (ng, mg) = ((n / g) as i64, (m / g) as i64);
    // |i/n - j/m| = |i·mg - j·ng| / lcm, so the bound is an integer on the lattice
    let lcm = (n / g * m) as f64;
    let bound = (statistic * lcm).round() as i64;
    if bound == 0 {
        return 1.0;
    }
    let inside = |i: usize, j: usize| (i as i64 * mg - j as i64 * ng).abs() < bound;

    // row[j] holds the mass at (i - 1, j) until it is overwritten with (i, j)
    let mut row = vec![0.0_f64; m + 1];
    for i in 0..=n {
        for j in 0..=m {
            let mut mass = if i == 0 && j == 0 { 1.0 } else { 0.0 };
            if i > 0 {
                let (left_n, left_m) = ((n - i + 1) as f64, (m - j) as f64);
                mass += row[j] * left_n / (left_n + left_m);
            }
            if j > 0 {
                let (left_n, left_m) = ((n - i) as f64, (m - j + 1) as f64);
                mass += row[j - 1] * left_m / (left_n + left_m);
            }
            row[j] = if inside(i, j) { mass } else { 0.0 };
        }
    }

    1.0 - row[m]
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Survival function of the Kolmogorov distribution, `Q(λ) = 2 Σ (-1)^(j-1) exp(-2 j² λ²)`.
///
/// Returns 1 when the alternating series does not converge, which happens for small λ.
fn kolmogorov_survival(lambda: f64) -> f64 {
    let exponent = -2.0 * lambda * lambda;
    let mut factor = 2.0;
    let mut sum = 0.0;
    let mut previous = 0.0;

    for j in 1..=100 {
        let j = j as f64;
        let term = factor * (exponent * j * j).exp();
        sum += term;
        if term.abs() <= 0.001 * previous || term.abs() <= 1e-8 * sum {
            return sum;
        }
        factor = -factor;
        previous = term.abs();
    }
    1.0
}
