//! Time-indexed irradiance samples and their cadence.

use crate::error::{Result, SynthError};
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

/// A fixed (hour, minute) position within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

/// Sampling cadence of a series, in whole minutes.
///
/// Only cadences that divide an hour are representable, so a day always splits into
/// `24 * (60 / minutes)` slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    minutes: u32,
}

impl Resolution {
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes == 0 || 60 % minutes != 0 {
            return Err(SynthError::malformed_input(format!(
                "resolution of {minutes} min does not divide an hour"
            )));
        }
        Ok(Self { minutes })
    }

    /// Infers the cadence as the median gap between consecutive timestamps.
    pub fn infer(timestamps: &[NaiveDateTime]) -> Result<Self> {
        if timestamps.len() < 2 {
            return Err(SynthError::malformed_input(
                "at least two timestamps are needed to infer a resolution",
            ));
        }

        let gaps: Vec<f64> = timestamps
            .windows(2)
            .map(|w| (w[1] - w[0]).num_seconds() as f64)
            .collect();
        let median_seconds = Data::new(gaps).median();

        // Whole minutes, truncated
        let minutes = (median_seconds / 60.0) as i64;
        if minutes <= 0 {
            return Err(SynthError::malformed_input(format!(
                "median sampling gap of {median_seconds}s is below one minute"
            )));
        }
        let minutes = u32::try_from(minutes).map_err(|_| {
            SynthError::malformed_input(format!("median sampling gap of {minutes} min is too large"))
        })?;

        Self::from_minutes(minutes)
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Length of one step as a fraction of an hour.
    pub fn hours(&self) -> f64 {
        self.minutes as f64 / 60.0
    }

    pub fn slots_per_hour(&self) -> usize {
        (60 / self.minutes) as usize
    }

    pub fn slots_per_day(&self) -> usize {
        24 * self.slots_per_hour()
    }

    /// All slots of a day, in chronological order.
    pub fn slots(&self) -> Vec<TimeSlot> {
        (0..24)
            .flat_map(|hour| {
                (0..60)
                    .step_by(self.minutes as usize)
                    .map(move |minute| TimeSlot { hour, minute })
            })
            .collect()
    }

    /// Position of a wall-clock time in the day's slot sequence, if it sits on the grid.
    pub fn slot_index(&self, time: NaiveTime) -> Option<usize> {
        if time.second() != 0 || time.minute() % self.minutes != 0 {
            return None;
        }
        Some(time.hour() as usize * self.slots_per_hour() + (time.minute() / self.minutes) as usize)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.minutes)
    }
}

/// Ordered timestamps with any number of named numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<NaiveDateTime>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl TimeSeries {
    /// Creates a series without columns. Timestamps must be non-empty and strictly increasing.
    pub fn new(timestamps: Vec<NaiveDateTime>) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(SynthError::malformed_input("time index is empty"));
        }
        if let Some(pos) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SynthError::malformed_input(format!(
                "time index is not strictly increasing at {} -> {}",
                timestamps[pos],
                timestamps[pos + 1]
            )));
        }

        Ok(Self {
            timestamps,
            columns: BTreeMap::new(),
        })
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if values.len() != self.timestamps.len() {
            return Err(SynthError::malformed_input(format!(
                "column '{name}' has {} values for {} timestamps",
                values.len(),
                self.timestamps.len()
            )));
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| SynthError::invalid_argument(format!("unknown column '{name}'")))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn resolution(&self) -> Result<Resolution> {
        Resolution::infer(&self.timestamps)
    }

    /// Index range of the samples falling in the given calendar month.
    pub fn month_range(&self, year: i32, month: u32) -> Range<usize> {
        let key = |ts: &NaiveDateTime| (ts.year(), ts.month());
        let start = self.timestamps.partition_point(|ts| key(ts) < (year, month));
        let end = self.timestamps.partition_point(|ts| key(ts) <= (year, month));
        start..end
    }

    /// Distinct (year, month) pairs present, in chronological order.
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut months: Vec<(i32, u32)> = self
            .timestamps
            .iter()
            .map(|ts| (ts.year(), ts.month()))
            .collect();
        months.dedup();
        months
    }
}

/// A series with its clear-sky irradiance and clearness index per point.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearnessSeries {
    series: TimeSeries,
    clear_sky: Vec<f64>,
    clearness: Vec<f64>,
}

impl ClearnessSeries {
    /// Pairs a series with per-point clear-sky values and clearness indices.
    ///
    /// Clearness values are normalised on the way in: undefined values become 1 and anything
    /// above 1 saturates at 1.
    pub fn new(series: TimeSeries, clear_sky: Vec<f64>, clearness: Vec<f64>) -> Result<Self> {
        if clear_sky.len() != series.len() || clearness.len() != series.len() {
            return Err(SynthError::malformed_input(format!(
                "clear-sky ({}) and clearness ({}) lengths must match the series ({})",
                clear_sky.len(),
                clearness.len(),
                series.len()
            )));
        }

        let clearness = clearness.into_iter().map(normalize_clearness).collect();
        Ok(Self {
            series,
            clear_sky,
            clearness,
        })
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        self.series.timestamps()
    }

    pub fn clear_sky(&self) -> &[f64] {
        &self.clear_sky
    }

    pub fn clearness(&self) -> &[f64] {
        &self.clearness
    }
}

/// Applies the clearness-index policy: NaN -> 1, values above 1 clip to 1.
pub fn normalize_clearness(kc: f64) -> f64 {
    if kc.is_nan() {
        1.0
    } else {
        kc.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hourly(day: u32, hours: u32) -> Vec<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(2020, 1, day).unwrap();
        (0..hours)
            .map(|h| date.and_hms_opt(h, 0, 0).unwrap())
            .collect()
    }

    #[test]
    fn test_resolution_inference_uses_median_gap() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut timestamps: Vec<NaiveDateTime> = (0..12)
            .map(|i| date.and_hms_opt(0, 0, 0).unwrap() + chrono::Duration::minutes(5 * i))
            .collect();
        // One 20 minute gap does not move the median
        timestamps.push(*timestamps.last().unwrap() + chrono::Duration::minutes(20));

        let resolution = Resolution::infer(&timestamps).unwrap();
        assert_eq!(resolution.minutes(), 5);
        assert_eq!(resolution.slots_per_day(), 288);
    }

    #[test]
    fn test_resolution_rejects_uneven_cadence() {
        assert!(Resolution::from_minutes(7).is_err());
        assert!(Resolution::from_minutes(0).is_err());
        assert!(Resolution::infer(&hourly(1, 1)).is_err());
    }

    #[test]
    fn test_slots_and_slot_index() {
        let resolution = Resolution::from_minutes(15).unwrap();
        let slots = resolution.slots();
        assert_eq!(slots.len(), 96);
        assert_eq!(slots[0], TimeSlot { hour: 0, minute: 0 });
        assert_eq!(slots[5], TimeSlot { hour: 1, minute: 15 });
        assert_eq!(slots[5].to_string(), "1:15");

        let time = NaiveTime::from_hms_opt(1, 15, 0).unwrap();
        assert_eq!(resolution.slot_index(time), Some(5));
        let off_grid = NaiveTime::from_hms_opt(1, 20, 0).unwrap();
        assert_eq!(resolution.slot_index(off_grid), None);
    }

    #[test]
    fn test_time_series_validation() {
        assert!(TimeSeries::new(Vec::new()).is_err());

        let mut timestamps = hourly(1, 3);
        timestamps.swap(1, 2);
        assert!(matches!(
            TimeSeries::new(timestamps),
            Err(SynthError::MalformedInput(_))
        ));

        let series = TimeSeries::new(hourly(1, 3)).unwrap();
        assert!(series.clone().with_column("ghi", vec![1.0]).is_err());

        let series = series.with_column("ghi", vec![0.0, 1.0, 2.0]).unwrap();
        assert_eq!(series.column("ghi").unwrap(), &[0.0, 1.0, 2.0]);
        assert!(matches!(
            series.column("dni"),
            Err(SynthError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_month_range() {
        let jan = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        let feb = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        let timestamps = vec![
            jan.and_hms_opt(22, 0, 0).unwrap(),
            jan.and_hms_opt(23, 0, 0).unwrap(),
            feb.and_hms_opt(0, 0, 0).unwrap(),
        ];
        let series = TimeSeries::new(timestamps).unwrap();

        assert_eq!(series.month_range(2020, 1), 0..2);
        assert_eq!(series.month_range(2020, 2), 2..3);
        assert!(series.month_range(2020, 3).is_empty());
        assert_eq!(series.months(), vec![(2020, 1), (2020, 2)]);
    }

    #[test]
    fn test_clearness_normalisation() {
        let series = TimeSeries::new(hourly(1, 3)).unwrap();
        let clearness =
            ClearnessSeries::new(series, vec![0.0, 100.0, 100.0], vec![f64::NAN, 1.3, 0.4])
                .unwrap();
        assert_eq!(clearness.clearness(), &[1.0, 1.0, 0.4]);
    }
}
