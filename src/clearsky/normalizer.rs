use super::ClearSkyProvider;
use crate::domain::{ClearnessSeries, Location, TimeSeries};
use crate::error::{Result, SynthError};
use tracing::debug;

/// Computes the clearness index of an irradiance column.
///
/// `kc = irradiance / clear_sky`, with 0/0 (night) mapped to 1 and values above 1 saturated
/// at 1. Fails on an uninferable resolution, an unknown column or an invalid location.
pub fn clear_sky_index(
    series: &TimeSeries,
    column: &str,
    location: &Location,
    provider: &dyn ClearSkyProvider,
) -> Result<ClearnessSeries> {
    location.validate()?;
    let resolution = series.resolution()?;
    let irradiance = series.column(column)?;

    let clear_sky = provider.clear_sky(location, series.timestamps())?;
    if clear_sky.len() != series.len() {
        return Err(SynthError::malformed_input(format!(
            "clear-sky provider returned {} values for {} timestamps",
            clear_sky.len(),
            series.len()
        )));
    }

    let clearness = irradiance
        .iter()
        .zip(&clear_sky)
        .map(|(observed, expected)| observed / expected)
        .collect();

    debug!(
        samples = series.len(),
        %resolution,
        column,
        "computed clear-sky index"
    );

    ClearnessSeries::new(series.clone(), clear_sky, clearness)
}
