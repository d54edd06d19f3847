//! Sky-condition classes and the typed key of a generation slice.

use crate::error::{Result, SynthError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// Daily sky condition derived from the median daytime clearness index.
///
/// Each class covers `(previous upper bound, upper_bound]`; `Sc5` is everything above 0.67.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SkyCondition {
    /// Totally covered, kc <= 0.2
    Sc1,
    /// Mostly covered, 0.2 < kc <= 0.4
    Sc2,
    /// Partly covered, 0.4 < kc <= 0.6
    Sc3,
    /// Mostly clear, 0.6 < kc <= 0.67
    Sc4,
    /// Totally clear, kc > 0.67
    Sc5,
}

impl SkyCondition {
    /// Inclusive upper clearness bound of the class.
    pub fn upper_bound(&self) -> f64 {
        match self {
            Self::Sc1 => 0.2,
            Self::Sc2 => 0.4,
            Self::Sc3 => 0.6,
            Self::Sc4 => 0.67,
            Self::Sc5 => f64::INFINITY,
        }
    }

    /// Class number, 1 through 5.
    pub fn number(&self) -> u8 {
        match self {
            Self::Sc1 => 1,
            Self::Sc2 => 2,
            Self::Sc3 => 3,
            Self::Sc4 => 4,
            Self::Sc5 => 5,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Sc1 => "sc1",
            Self::Sc2 => "sc2",
            Self::Sc3 => "sc3",
            Self::Sc4 => "sc4",
            Self::Sc5 => "sc5",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Sc1 => "totally covered",
            Self::Sc2 => "mostly covered",
            Self::Sc3 => "partly covered",
            Self::Sc4 => "mostly clear",
            Self::Sc5 => "totally clear",
        }
    }

    /// Buckets a median daily clearness index. Returns `None` for NaN.
    pub fn classify(median_kc: f64) -> Option<Self> {
        if median_kc.is_nan() {
            return None;
        }
        Self::iter().find(|sc| median_kc <= sc.upper_bound())
    }
}

impl fmt::Display for SkyCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SkyCondition {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::iter()
            .find(|sc| sc.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                SynthError::invalid_argument(format!(
                    "invalid sky condition '{s}', select one of sc1, sc2, sc3, sc4, sc5"
                ))
            })
    }
}

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Identifies one (year, month, sky condition) generation slice.
///
/// The month is always in `1..=12`, deserialization included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSliceKey")]
pub struct SliceKey {
    year: i32,
    month: u32,
    sky_condition: SkyCondition,
}

#[derive(Deserialize)]
struct RawSliceKey {
    year: i32,
    month: u32,
    sky_condition: SkyCondition,
}

impl TryFrom<RawSliceKey> for SliceKey {
    type Error = SynthError;

    fn try_from(raw: RawSliceKey) -> Result<Self> {
        Self::new(raw.year, raw.month, raw.sky_condition)
    }
}

impl SliceKey {
    pub fn new(year: i32, month: u32, sky_condition: SkyCondition) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(SynthError::invalid_argument(format!(
                "month {month} is outside 1..=12"
            )));
        }
        Ok(Self {
            year,
            month,
            sky_condition,
        })
    }

    /// Parses the sky condition from its code, e.g. `"sc3"`.
    pub fn parse(year: i32, month: u32, sky_condition: &str) -> Result<Self> {
        Self::new(year, month, sky_condition.parse()?)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn sky_condition(&self) -> SkyCondition {
        self.sky_condition
    }

    pub fn month_abbreviation(&self) -> &'static str {
        self.month
            .checked_sub(1)
            .and_then(|index| MONTH_ABBREVIATIONS.get(index as usize))
            .copied()
            .unwrap_or("???")
    }

    /// Output label, e.g. `Jan2020-sc3`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SliceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}-{}",
            self.month_abbreviation(),
            self.year,
            self.sky_condition
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-0.5, SkyCondition::Sc1)]
    #[case(0.0, SkyCondition::Sc1)]
    #[case(0.2, SkyCondition::Sc1)]
    #[case(0.2000001, SkyCondition::Sc2)]
    #[case(0.4, SkyCondition::Sc2)]
    #[case(0.5, SkyCondition::Sc3)]
    #[case(0.6, SkyCondition::Sc3)]
    #[case(0.67, SkyCondition::Sc4)]
    #[case(0.6700001, SkyCondition::Sc5)]
    #[case(1.0, SkyCondition::Sc5)]
    fn test_breakpoints(#[case] kc: f64, #[case] expected: SkyCondition) {
        assert_eq!(SkyCondition::classify(kc), Some(expected));
    }

    #[test]
    fn test_nan_is_unclassified() {
        assert_eq!(SkyCondition::classify(f64::NAN), None);
    }

    #[test]
    fn test_parse_sky_condition() {
        assert_eq!("sc1".parse::<SkyCondition>().unwrap(), SkyCondition::Sc1);
        assert_eq!("SC5".parse::<SkyCondition>().unwrap(), SkyCondition::Sc5);
        assert!(matches!(
            "sc6".parse::<SkyCondition>(),
            Err(SynthError::InvalidArgument(_))
        ));
        assert!("".parse::<SkyCondition>().is_err());
    }

    #[test]
    fn test_ordering_follows_clearness() {
        let all: Vec<SkyCondition> = SkyCondition::iter().collect();
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_slice_label() {
        let key = SliceKey::parse(2020, 1, "sc3").unwrap();
        assert_eq!(key.label(), "Jan2020-sc3");

        let key = SliceKey::new(2019, 12, SkyCondition::Sc5).unwrap();
        assert_eq!(key.to_string(), "Dec2019-sc5");

        assert!(SliceKey::new(2019, 13, SkyCondition::Sc5).is_err());
        assert!(SliceKey::parse(2019, 1, "clear").is_err());
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn test_deserialize_rejects_month_out_of_range(#[case] month: u32) {
        let json = format!(r#"{{"year":2020,"month":{month},"sky_condition":"sc1"}}"#);
        let err = serde_json::from_str::<SliceKey>(&json).unwrap_err();
        assert!(err.to_string().contains("outside 1..=12"), "{err}");
    }

    #[test]
    fn test_deserialize_round_trips_valid_key() {
        let json = r#"{"year":2020,"month":2,"sky_condition":"sc4"}"#;
        let key: SliceKey = serde_json::from_str(json).unwrap();
        assert_eq!(key.month(), 2);
        assert_eq!(key.sky_condition(), SkyCondition::Sc4);
        assert_eq!(key.to_string(), "Feb2020-sc4");
        assert_eq!(serde_json::to_string(&key).unwrap(), json);
    }
}
