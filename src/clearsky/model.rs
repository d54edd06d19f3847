//! # Clear-Sky Radiation Model
//!
//! Simplified clear-sky global horizontal irradiance from solar geometry and a
//! Kasten-style atmospheric transmittance.

use super::ClearSkyProvider;
use crate::domain::Location;
use crate::error::Result;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Scale height of the atmosphere in metres, for the pressure correction of air mass
const SCALE_HEIGHT_M: f64 = 8434.5;

/// Clear-sky solar radiation model
///
/// Accounts for:
/// - Solar position (declination, hour angle, local time-zone offset)
/// - Atmospheric attenuation growing with air mass
/// - Thinner atmosphere at altitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearSkyModel {
    /// Irradiance at the top of the atmosphere (W/m²)
    pub solar_constant: f64,
    /// Clear-sky transmittance at air mass 1
    pub transmittance: f64,
}

impl Default for ClearSkyModel {
    fn default() -> Self {
        Self {
            solar_constant: 1367.0,
            transmittance: 0.7,
        }
    }
}

impl ClearSkyModel {
    /// Calculate solar position (elevation and azimuth) at a local wall-clock time
    ///
    /// Returns: (elevation_deg, azimuth_deg)
    /// Elevation: angle above horizon (0 = horizon, 90 = directly overhead)
    /// Azimuth: angle from north (0 = north, 90 = east, 180 = south, 270 = west)
    pub fn solar_position(&self, location: &Location, time: NaiveDateTime) -> (f64, f64) {
        let day_of_year = time.ordinal() as f64;
        let hour = time.hour() as f64 + time.minute() as f64 / 60.0 + time.second() as f64 / 3600.0;

        // Varies from -23.45° (winter solstice) to +23.45° (summer solstice)
        let declination_deg = 23.45 * (360.0 / 365.0 * (day_of_year + 284.0) * PI / 180.0).sin();
        let declination_rad = declination_deg.to_radians();
        let latitude_rad = location.latitude.to_radians();

        let solar_time = hour + location.longitude / 15.0 - location.utc_offset_hours(time);
        let hour_angle_deg = 15.0 * (solar_time - 12.0);
        let hour_angle_rad = hour_angle_deg.to_radians();

        let elevation_sin = latitude_rad.sin() * declination_rad.sin()
            + latitude_rad.cos() * declination_rad.cos() * hour_angle_rad.cos();
        let elevation_rad = elevation_sin.clamp(-1.0, 1.0).asin();
        let elevation_deg = elevation_rad.to_degrees();

        let azimuth_cos = (declination_rad.sin() - latitude_rad.sin() * elevation_rad.sin())
            / (latitude_rad.cos() * elevation_rad.cos());
        let mut azimuth_deg = azimuth_cos.clamp(-1.0, 1.0).acos().to_degrees();

        // Afternoon sun is in the western sky
        if hour_angle_deg > 0.0 {
            azimuth_deg = 360.0 - azimuth_deg;
        }

        (elevation_deg, azimuth_deg)
    }

    /// Clear-sky global horizontal irradiance in W/m²
    pub fn irradiance(&self, location: &Location, time: NaiveDateTime) -> f64 {
        let (elevation_deg, _) = self.solar_position(location, time);

        if elevation_deg <= 0.0 {
            return 0.0;
        }

        let elevation_rad = elevation_deg.to_radians();

        // Relative air mass, approximated near the horizon to avoid the singularity
        let relative_air_mass = if elevation_deg > 5.0 {
            1.0 / elevation_rad.sin()
        } else {
            12.0 - elevation_deg / 5.0
        };
        let air_mass = relative_air_mass * (-location.altitude / SCALE_HEIGHT_M).exp();

        let transmittance = self.transmittance.powf(air_mass.powf(0.678));

        self.solar_constant * transmittance * elevation_rad.sin()
    }
}

impl ClearSkyProvider for ClearSkyModel {
    fn clear_sky(&self, location: &Location, timestamps: &[NaiveDateTime]) -> Result<Vec<f64>> {
        Ok(timestamps
            .iter()
            .map(|ts| self.irradiance(location, *ts))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Tz;

    fn stockholm() -> Location {
        Location::new(59.3293, 18.0686, 28.0, Tz::Europe__Stockholm).unwrap()
    }

    fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_solar_position_noon() {
        // Summer solstice, local solar noon is ~13:12 under CEST
        let model = ClearSkyModel::default();
        let (elevation, azimuth) = model.solar_position(&stockholm(), at(6, 21, 13, 12));

        assert!(elevation > 50.0 && elevation < 60.0);
        assert!(azimuth > 160.0 && azimuth < 200.0);
    }

    #[test]
    fn test_clear_sky_irradiance() {
        let model = ClearSkyModel::default();
        let location = stockholm();

        let summer = model.irradiance(&location, at(6, 21, 13, 0));
        assert!(summer > 700.0);

        let winter = model.irradiance(&location, at(12, 21, 12, 0));
        assert!(winter > 0.0);
        assert!(winter < 300.0);

        assert_eq!(model.irradiance(&location, at(6, 21, 2, 0)), 0.0);
    }

    #[test]
    fn test_altitude_increases_irradiance() {
        let model = ClearSkyModel::default();
        let sea_level = stockholm();
        let mountain = Location {
            altitude: 3000.0,
            ..sea_level
        };
        let time = at(6, 21, 13, 0);

        assert!(model.irradiance(&mountain, time) > model.irradiance(&sea_level, time));
    }

    #[test]
    fn test_provider_returns_one_value_per_timestamp() {
        let model = ClearSkyModel::default();
        let timestamps: Vec<NaiveDateTime> = (0..24).map(|h| at(3, 1, h, 0)).collect();
        let values = model.clear_sky(&stockholm(), &timestamps).unwrap();

        assert_eq!(values.len(), 24);
        assert!(values.iter().all(|v| *v >= 0.0));
        assert_eq!(values[0], 0.0);
        assert!(values[12] > 0.0);
    }
}
