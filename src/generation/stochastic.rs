use super::{clip, ensure_runs};
use crate::domain::{SliceKey, SlotStatistics, SyntheticEnsemble};
use crate::error::{Result, SynthError};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, warn};

/// Independent per-slot normal draws.
///
/// For every run and slot, draws from `Normal(mean, std)` of that slot and clips the draw to
/// the slot's historical `[min, max]`. Returns `Ok(None)` when the slice has no history.
pub fn generate_stochastic<R: Rng + ?Sized>(
    statistics: &[SlotStatistics],
    key: SliceKey,
    runs: usize,
    rng: &mut R,
) -> Result<Option<SyntheticEnsemble>> {
    ensure_runs(runs)?;

    if statistics.is_empty() {
        warn!(slice = %key, "no historical data for slice");
        return Ok(None);
    }

    let distributions = statistics
        .iter()
        .map(|s| {
            Normal::new(s.mean, s.std).map_err(|e| {
                SynthError::malformed_input(format!(
                    "slot {} of {key} has no usable distribution: {e}",
                    s.slot
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut ensemble = Vec::with_capacity(runs);
    for _ in 0..runs {
        let mut profile = Vec::with_capacity(statistics.len());
        for (slot, normal) in statistics.iter().zip(&distributions) {
            profile.push(clip(normal.sample(rng), slot.min, slot.max));
        }
        ensemble.push(profile);
    }

    debug!(slice = %key, runs, slots = statistics.len(), "generated stochastic ensemble");

    let slots = statistics.iter().map(|s| s.slot).collect();
    Ok(Some(SyntheticEnsemble::new(key, slots, ensemble)))
}
