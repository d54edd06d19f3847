use crate::error::{Result, SynthError};
use chrono::{LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Geographic site of a measurement series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Degrees, positive north
    pub latitude: f64,
    /// Degrees, positive east
    pub longitude: f64,
    /// Metres above sea level
    pub altitude: f64,
    /// IANA zone the series timestamps are expressed in
    pub time_zone: Tz,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, altitude: f64, time_zone: Tz) -> Result<Self> {
        let location = Self {
            latitude,
            longitude,
            altitude,
            time_zone,
        };
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SynthError::invalid_argument(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(SynthError::invalid_argument(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        if !self.altitude.is_finite() {
            return Err(SynthError::invalid_argument("altitude must be finite"));
        }
        Ok(())
    }

    /// UTC offset in hours in effect at a local wall-clock time.
    ///
    /// Times skipped by a DST transition fall back to the offset at the same UTC instant.
    pub fn utc_offset_hours(&self, local: NaiveDateTime) -> f64 {
        let offset = match self.time_zone.offset_from_local_datetime(&local) {
            LocalResult::Single(offset) | LocalResult::Ambiguous(offset, _) => offset,
            LocalResult::None => self.time_zone.offset_from_utc_datetime(&local),
        };
        f64::from(offset.fix().local_minus_utc()) / 3600.0
    }
}
