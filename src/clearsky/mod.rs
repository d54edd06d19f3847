//! # Clear-Sky Normalisation
//!
//! Turns measured irradiance into a clearness index and buckets days into sky conditions.
//!
//! - **Provider**: any source of expected clear-sky irradiance for a site and a list of
//!   timestamps; [`ClearSkyModel`] is a simple built-in one
//! - **Normalizer**: observed / clear-sky ratio per timestamp
//! - **Classifier**: median daytime clearness per day, mapped onto [`SkyCondition`]
//!
//! [`SkyCondition`]: crate::domain::SkyCondition

pub mod classifier;
pub mod model;
pub mod normalizer;

pub use classifier::{classify_days, DayClassification, DAYTIME_HOURS};
pub use model::ClearSkyModel;
pub use normalizer::clear_sky_index;

use crate::domain::Location;
use crate::error::Result;
use chrono::NaiveDateTime;

/// Source of expected clear-sky irradiance (W/m²).
pub trait ClearSkyProvider {
    /// One value per timestamp, in the same order.
    fn clear_sky(&self, location: &Location, timestamps: &[NaiveDateTime]) -> Result<Vec<f64>>;
}

impl<F> ClearSkyProvider for F
where
    F: Fn(&Location, &[NaiveDateTime]) -> Result<Vec<f64>>,
{
    fn clear_sky(&self, location: &Location, timestamps: &[NaiveDateTime]) -> Result<Vec<f64>> {
        self(location, timestamps)
    }
}
