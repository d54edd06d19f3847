use super::ensure_runs;
use crate::domain::{DailyProfiles, SliceKey, SyntheticEnsemble};
use crate::error::Result;
use rand::Rng;
use tracing::{debug, warn};

/// Resamples whole historical days with replacement.
///
/// Every generated profile is a verbatim copy of one historical day, so the intraday
/// correlation of the history is kept. Returns `Ok(None)` when the slice has no history.
pub fn generate_bootstrap<R: Rng + ?Sized>(
    profiles: &DailyProfiles,
    key: SliceKey,
    runs: usize,
    rng: &mut R,
) -> Result<Option<SyntheticEnsemble>> {
    ensure_runs(runs)?;

    if profiles.is_empty() {
        warn!(slice = %key, "no historical data for slice");
        return Ok(None);
    }

    let ensemble: Vec<Vec<f64>> = (0..runs)
        .map(|_| profiles.rows()[rng.gen_range(0..profiles.len())].clone())
        .collect();

    debug!(slice = %key, runs, days = profiles.len(), "generated bootstrap ensemble");

    Ok(Some(SyntheticEnsemble::new(key, profiles.slots(), ensemble)))
}
