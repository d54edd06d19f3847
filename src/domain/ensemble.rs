use super::series::TimeSlot;
use super::sky::SliceKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// Generated daily profiles for one slice, one column per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticEnsemble {
    key: SliceKey,
    slots: Vec<TimeSlot>,
    runs: Vec<Vec<f64>>,
}

/// Ensembles of several slices, keyed by slice.
pub type EnsembleSet = BTreeMap<SliceKey, SyntheticEnsemble>;

impl SyntheticEnsemble {
    pub(crate) fn new(key: SliceKey, slots: Vec<TimeSlot>, runs: Vec<Vec<f64>>) -> Self {
        debug_assert!(runs.iter().all(|run| run.len() == slots.len()));
        Self { key, slots, runs }
    }

    pub fn key(&self) -> SliceKey {
        self.key
    }

    pub fn label(&self) -> String {
        self.key.label()
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn runs(&self) -> &[Vec<f64>] {
        &self.runs
    }

    pub fn run(&self, index: usize) -> Option<&[f64]> {
        self.runs.get(index).map(Vec::as_slice)
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Column names in the `synt{n}` convention, 1-based.
    pub fn run_names(&self) -> Vec<String> {
        (1..=self.runs.len()).map(|i| format!("synt{i}")).collect()
    }

    pub fn value(&self, slot: usize, run: usize) -> Option<f64> {
        self.runs.get(run).and_then(|r| r.get(slot)).copied()
    }

    /// Row view: every slot with the generated value of each run.
    pub fn rows(&self) -> impl Iterator<Item = (TimeSlot, Vec<f64>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (*slot, self.runs.iter().map(|run| run[i]).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SkyCondition;

    #[test]
    fn test_row_view() {
        let key = SliceKey::new(2021, 6, SkyCondition::Sc2).unwrap();
        let slots = vec![TimeSlot { hour: 0, minute: 0 }, TimeSlot { hour: 0, minute: 30 }];
        let ensemble = SyntheticEnsemble::new(key, slots, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        assert_eq!(ensemble.label(), "Jun2021-sc2");
        assert_eq!(ensemble.run_names(), vec!["synt1", "synt2"]);
        assert_eq!(ensemble.value(1, 1), Some(4.0));
        assert_eq!(ensemble.value(2, 0), None);

        let rows: Vec<_> = ensemble.rows().collect();
        assert_eq!(rows[1], (TimeSlot { hour: 0, minute: 30 }, vec![2.0, 4.0]));
    }
}
