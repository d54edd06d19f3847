//! Variability indicators of a single irradiance series.

use super::{ensure_min_len, increments, MetricsError};
use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use statrs::statistics::{Data, Median, Statistics};

/// Step size above which a change counts as unstable (W/m²)
pub const DEFAULT_STABILITY_THRESHOLD: f64 = 500.0;

/// Sample standard deviation of the absolute increments.
///
/// The first increment is defined as 0, so a series of `n` values yields `n` increments.
pub fn standard_deviation_increments(data: &[f64]) -> Result<f64, MetricsError> {
    ensure_min_len(data, 2)?;
    Ok(increments(data).iter().std_dev())
}

/// Number of consecutive steps whose absolute change exceeds `threshold`.
pub fn stability_index(data: &[f64], threshold: f64) -> usize {
    increments(data)
        .into_iter()
        .filter(|delta| *delta > threshold)
        .count()
}

/// Empirical CDF: sorted values paired with `rank / (n - 1)`.
pub fn empirical_cdf(data: &[f64]) -> Result<(Vec<f64>, Vec<f64>), MetricsError> {
    ensure_min_len(data, 2)?;
    if data.iter().any(|v| v.is_nan()) {
        return Err(MetricsError::InvalidInput("data contains NaN".to_string()));
    }

    let mut x = data.to_vec();
    x.sort_by_key(|v| OrderedFloat(*v));

    let last = (x.len() - 1) as f64;
    let y = (0..x.len()).map(|rank| rank as f64 / last).collect();
    Ok((x, y))
}

/// Integrated complementary CDF: the area under `1 - CDF` over the value domain.
pub fn iccdf(data: &[f64]) -> Result<f64, MetricsError> {
    let (x, cdf) = empirical_cdf(data)?;
    let y: Vec<f64> = cdf.iter().map(|p| 1.0 - p).collect();
    Ok(simpson(&x, &y))
}

/// Per-timestamp ratio of the measured to the clear-sky step length.
///
/// Each step length is `sqrt(ΔG² + Δt²)` with `Δt` the median sampling interval in whole
/// minutes. The first point and every undefined ratio are set to 1.
pub fn variability_index(
    timestamps: &[NaiveDateTime],
    ghi: &[f64],
    clear_sky: &[f64],
) -> Result<Vec<f64>, MetricsError> {
    super::ensure_same_length(ghi, clear_sky)?;
    if timestamps.len() != ghi.len() {
        return Err(MetricsError::InvalidInput(format!(
            "{} timestamps for {} values",
            timestamps.len(),
            ghi.len()
        )));
    }
    ensure_min_len(ghi, 2)?;

    let gaps: Vec<f64> = timestamps
        .windows(2)
        .map(|w| (w[1] - w[0]).num_seconds() as f64)
        .collect();
    let dt = (Data::new(gaps).median() / 60.0).trunc();

    let step = |values: &[f64], i: usize| -> f64 {
        if i == 0 {
            0.0
        } else {
            ((values[i] - values[i - 1]).powi(2) + dt.powi(2)).sqrt()
        }
    };

    Ok((0..ghi.len())
        .map(|i| {
            let ratio = step(ghi, i) / step(clear_sky, i);
            if ratio.is_nan() {
                1.0
            } else {
                ratio
            }
        })
        .collect())
}

/// Composite Simpson's rule over irregularly spaced abscissae.
///
/// Divisions by a zero width contribute zero. With an even number of points the last
/// interval is added with Cartwright's three-point correction; two points use the trapezoid.
fn simpson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 {
        return 0.0;
    }
    if n == 2 {
        return 0.5 * (x[1] - x[0]) * (y[0] + y[1]);
    }

    let end = if n % 2 == 1 { n } else { n - 1 };
    let mut total = 0.0;
    for i in (0..end - 2).step_by(2) {
        let h0 = x[i + 1] - x[i];
        let h1 = x[i + 2] - x[i + 1];
        let hsum = h0 + h1;
        let hprod = h0 * h1;
        let ratio = safe_div(h0, h1);
        total += hsum / 6.0
            * (y[i] * (2.0 - safe_div(1.0, ratio))
                + y[i + 1] * (hsum * safe_div(hsum, hprod))
                + y[i + 2] * (2.0 - ratio));
    }

    if n % 2 == 0 {
        let h0 = x[n - 2] - x[n - 3];
        let h1 = x[n - 1] - x[n - 2];
        let alpha = safe_div(2.0 * h1 * h1 + 3.0 * h0 * h1, 6.0 * (h0 + h1));
        let beta = safe_div(h1 * h1 + 3.0 * h0 * h1, 6.0 * h0);
        let eta = safe_div(h1 * h1 * h1, 6.0 * h0 * (h0 + h1));
        total += alpha * y[n - 1] + beta * y[n - 2] - eta * y[n - 3];
    }

    total
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
