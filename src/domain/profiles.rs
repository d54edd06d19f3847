//! Historical daily profiles of one slice and their per-slot description.

use super::series::{Resolution, TimeSlot};
use crate::error::{Result, SynthError};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Matrix of historical days (rows) by time-of-day slots (columns).
#[derive(Debug, Clone, PartialEq)]
pub struct DailyProfiles {
    resolution: Resolution,
    days: Vec<u32>,
    rows: Vec<Vec<f64>>,
}

impl DailyProfiles {
    /// Builds the matrix; `days[i]` is the day-of-month of `rows[i]`.
    pub fn new(resolution: Resolution, days: Vec<u32>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if days.len() != rows.len() {
            return Err(SynthError::malformed_input(format!(
                "{} day labels for {} profiles",
                days.len(),
                rows.len()
            )));
        }
        let width = resolution.slots_per_day();
        if let Some((day, row)) = days.iter().zip(&rows).find(|(_, row)| row.len() != width) {
            return Err(SynthError::malformed_input(format!(
                "profile of day {day} has {} slots, expected {width}",
                row.len()
            )));
        }

        Ok(Self {
            resolution,
            days,
            rows,
        })
    }

    pub fn empty(resolution: Resolution) -> Self {
        Self {
            resolution,
            days: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn days(&self) -> &[u32] {
        &self.days
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Number of historical days.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn slots(&self) -> Vec<TimeSlot> {
        self.resolution.slots()
    }

    /// Values of one slot across all days.
    pub fn column(&self, slot: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[slot]).collect()
    }

    /// Per-slot count, mean, sample standard deviation, min and max.
    ///
    /// Empty when there are no days.
    pub fn describe(&self) -> Vec<SlotStatistics> {
        if self.is_empty() {
            return Vec::new();
        }
        self.slots()
            .into_iter()
            .enumerate()
            .map(|(i, slot)| SlotStatistics::from_values(slot, &self.column(i)))
            .collect()
    }
}

/// Descriptive statistics of one time slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotStatistics {
    pub slot: TimeSlot,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); zero for a single observation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl SlotStatistics {
    pub fn from_values(slot: TimeSlot, values: &[f64]) -> Self {
        let std = if values.len() > 1 {
            values.iter().std_dev()
        } else {
            0.0
        };

        Self {
            slot,
            count: values.len(),
            mean: values.iter().mean(),
            std,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly() -> Resolution {
        Resolution::from_minutes(60).unwrap()
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = DailyProfiles::new(hourly(), vec![1], vec![vec![0.0; 23]]);
        assert!(matches!(result, Err(SynthError::MalformedInput(_))));

        let result = DailyProfiles::new(hourly(), vec![1, 2], vec![vec![0.0; 24]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_describe() {
        let day1: Vec<f64> = (0..24).map(|h| h as f64).collect();
        let day2: Vec<f64> = (0..24).map(|h| h as f64 + 2.0).collect();
        let profiles = DailyProfiles::new(hourly(), vec![3, 9], vec![day1, day2]).unwrap();

        let stats = profiles.describe();
        assert_eq!(stats.len(), 24);
        assert_eq!(stats[10].slot, TimeSlot { hour: 10, minute: 0 });
        assert_eq!(stats[10].count, 2);
        assert_eq!(stats[10].mean, 11.0);
        assert_eq!(stats[10].min, 10.0);
        assert_eq!(stats[10].max, 12.0);
        assert!((stats[10].std - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_day_has_zero_spread() {
        let profiles = DailyProfiles::new(hourly(), vec![1], vec![vec![5.0; 24]]).unwrap();
        let stats = profiles.describe();
        assert!(stats.iter().all(|s| s.std == 0.0 && s.min == 5.0 && s.max == 5.0));
    }

    #[test]
    fn test_empty_profiles_describe_nothing() {
        assert!(DailyProfiles::empty(hourly()).describe().is_empty());
    }
}
