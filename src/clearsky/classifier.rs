use crate::domain::{ClearnessSeries, SkyCondition};
use crate::error::{Result, SynthError};
use chrono::{Datelike, Timelike};
use itertools::Itertools;
use statrs::statistics::{Data, Median};
use std::collections::BTreeMap;
use std::ops::Range;
use strum::IntoEnumIterator;
use tracing::debug;

/// Local hours whose readings feed the daily median clearness index.
pub const DAYTIME_HOURS: Range<u32> = 6..18;

/// Sky condition of every classified day in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct DayClassification {
    year: i32,
    month: u32,
    medians: BTreeMap<u32, f64>,
    classes: BTreeMap<SkyCondition, Vec<u32>>,
}

impl DayClassification {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Days of the month (1-based) in a class, ascending.
    pub fn days(&self, sky_condition: SkyCondition) -> &[u32] {
        self.classes
            .get(&sky_condition)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Median daytime clearness index of a classified day.
    pub fn median(&self, day: u32) -> Option<f64> {
        self.medians.get(&day).copied()
    }

    pub fn sky_condition(&self, day: u32) -> Option<SkyCondition> {
        self.median(day).and_then(SkyCondition::classify)
    }

    pub fn total_days(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }

    /// Number of days per class, in class order.
    pub fn counts(&self) -> Vec<(SkyCondition, usize)> {
        SkyCondition::iter()
            .map(|sc| (sc, self.days(sc).len()))
            .collect()
    }
}

/// Classifies the days of one month by their median daytime clearness index.
///
/// Days without daytime readings are left out. Every other day lands in exactly one class.
pub fn classify_days(series: &ClearnessSeries, year: i32, month: u32) -> Result<DayClassification> {
    if !(1..=12).contains(&month) {
        return Err(SynthError::invalid_argument(format!(
            "month {month} is outside 1..=12"
        )));
    }

    let range = series.series().month_range(year, month);
    let timestamps = &series.timestamps()[range.clone()];
    let clearness = &series.clearness()[range];

    let daytime = timestamps
        .iter()
        .zip(clearness)
        .filter(|(ts, _)| DAYTIME_HOURS.contains(&ts.hour()));

    let mut medians = BTreeMap::new();
    let mut classes: BTreeMap<SkyCondition, Vec<u32>> =
        SkyCondition::iter().map(|sc| (sc, Vec::new())).collect();

    for (day, readings) in &daytime.chunk_by(|(ts, _)| ts.day()) {
        let values: Vec<f64> = readings.map(|(_, kc)| *kc).collect();
        let median = Data::new(values).median();

        if let Some(sky_condition) = SkyCondition::classify(median) {
            medians.insert(day, median);
            classes.entry(sky_condition).or_default().push(day);
        }
    }

    let classification = DayClassification {
        year,
        month,
        medians,
        classes,
    };

    debug!(
        year,
        month,
        days = classification.total_days(),
        sc1 = classification.days(SkyCondition::Sc1).len(),
        sc2 = classification.days(SkyCondition::Sc2).len(),
        sc3 = classification.days(SkyCondition::Sc3).len(),
        sc4 = classification.days(SkyCondition::Sc4).len(),
        sc5 = classification.days(SkyCondition::Sc5).len(),
        "classified days"
    );

    Ok(classification)
}
