//! Per-class historical tables for one month.

use crate::clearsky::{classify_days, DayClassification};
use crate::domain::{
    ClearnessSeries, DailyProfiles, Resolution, SkyCondition, SliceKey, SlotStatistics,
};
use crate::error::Result;
use chrono::{Datelike, NaiveDateTime};
use itertools::Itertools;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

/// Classified historical data of one (year, month), split by sky condition.
#[derive(Debug, Clone)]
pub struct MonthlyAnalysis {
    year: i32,
    month: u32,
    resolution: Resolution,
    classification: DayClassification,
    profiles: BTreeMap<SkyCondition, DailyProfiles>,
    statistics: BTreeMap<SkyCondition, Vec<SlotStatistics>>,
}

impl MonthlyAnalysis {
    /// Classifies the month's days and reshapes each class into a day-by-slot matrix.
    ///
    /// The resolution is inferred from the whole series. Days with missing or off-grid
    /// samples cannot form a complete profile and are skipped.
    pub fn build(series: &ClearnessSeries, column: &str, year: i32, month: u32) -> Result<Self> {
        let resolution = series.series().resolution()?;
        let values = series.series().column(column)?;
        let classification = classify_days(series, year, month)?;

        let range = series.series().month_range(year, month);
        let timestamps = &series.timestamps()[range.clone()];
        let values = &values[range];

        let days = complete_days(timestamps, values, resolution);

        let mut profiles = BTreeMap::new();
        let mut statistics = BTreeMap::new();
        for sky_condition in SkyCondition::iter() {
            let (labels, rows): (Vec<u32>, Vec<Vec<f64>>) = classification
                .days(sky_condition)
                .iter()
                .filter_map(|day| days.get(day).map(|row| (*day, row.clone())))
                .unzip();
            let table = DailyProfiles::new(resolution, labels, rows)?;
            statistics.insert(sky_condition, table.describe());
            profiles.insert(sky_condition, table);
        }

        Ok(Self {
            year,
            month,
            resolution,
            classification,
            profiles,
            statistics,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn classification(&self) -> &DayClassification {
        &self.classification
    }

    pub fn key(&self, sky_condition: SkyCondition) -> Result<SliceKey> {
        SliceKey::new(self.year, self.month, sky_condition)
    }

    /// Historical profiles of a class, one row per day.
    pub fn profiles(&self, sky_condition: SkyCondition) -> &DailyProfiles {
        &self.profiles[&sky_condition]
    }

    /// Per-slot statistics of a class; empty when the class has no days.
    pub fn statistics(&self, sky_condition: SkyCondition) -> &[SlotStatistics] {
        &self.statistics[&sky_condition]
    }
}

/// Groups samples by day and keeps the days that fill every slot.
fn complete_days(
    timestamps: &[NaiveDateTime],
    values: &[f64],
    resolution: Resolution,
) -> BTreeMap<u32, Vec<f64>> {
    let width = resolution.slots_per_day();
    let mut days = BTreeMap::new();

    for (day, samples) in &timestamps.iter().zip(values).chunk_by(|(ts, _)| ts.day()) {
        let mut row: Vec<Option<f64>> = vec![None; width];
        for (ts, value) in samples {
            if let Some(slot) = resolution.slot_index(ts.time()) {
                row[slot] = Some(*value);
            }
        }

        match row.into_iter().collect::<Option<Vec<f64>>>() {
            Some(profile) => {
                days.insert(day, profile);
            }
            None => warn!(day, %resolution, "skipping incomplete day"),
        }
    }

    debug!(days = days.len(), "reshaped complete days");
    days
}
