//! Invariants every generator must hold for arbitrary historical tables.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use solar_synth::domain::{DailyProfiles, Resolution, SkyCondition, SliceKey, SyntheticEnsemble};
use solar_synth::generation::{
    generate_bootstrap, generate_sequential_from_profiles, generate_stochastic, SamplingMethod,
};

const SLOTS: usize = 24;

fn key() -> SliceKey {
    SliceKey::new(2020, 1, SkyCondition::Sc3).unwrap()
}

fn table(rows: Vec<Vec<f64>>) -> DailyProfiles {
    let days = (1..=rows.len() as u32).collect();
    DailyProfiles::new(Resolution::from_minutes(60).unwrap(), days, rows).unwrap()
}

fn history() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(0.0..1000.0f64, SLOTS), 1..8)
}

fn assert_within_slot_range(ensemble: &SyntheticEnsemble, history: &DailyProfiles) {
    for run in ensemble.runs() {
        for (slot, value) in run.iter().enumerate() {
            let column = history.column(slot);
            let min = column.iter().copied().fold(f64::INFINITY, f64::min);
            let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert!(
                (min..=max).contains(value),
                "slot {slot}: {value} outside [{min}, {max}]"
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_stochastic_within_historical_range(rows in history(), seed in any::<u64>()) {
        let history = table(rows);
        let mut rng = StdRng::seed_from_u64(seed);

        let ensemble = generate_stochastic(&history.describe(), key(), 10, &mut rng)
            .unwrap()
            .unwrap();
        prop_assert_eq!(ensemble.run_count(), 10);
        assert_within_slot_range(&ensemble, &history);
    }

    #[test]
    fn prop_bootstrap_rows_are_historical(rows in history(), seed in any::<u64>()) {
        let history = table(rows);
        let mut rng = StdRng::seed_from_u64(seed);

        let ensemble = generate_bootstrap(&history, key(), 10, &mut rng)
            .unwrap()
            .unwrap();
        for run in ensemble.runs() {
            prop_assert!(history.rows().contains(run));
        }
    }

    #[test]
    fn prop_sequential_bootstrap_values_observed_in_slot(
        rows in history(),
        seed in any::<u64>(),
        confidence_level in 0.5..0.99f64,
    ) {
        let history = table(rows);
        let mut rng = StdRng::seed_from_u64(seed);

        let ensemble = generate_sequential_from_profiles(
            &history,
            key(),
            SamplingMethod::Bootstrap,
            confidence_level,
            10,
            &mut rng,
        )
        .unwrap()
        .unwrap();

        for run in ensemble.runs() {
            for (slot, value) in run.iter().enumerate() {
                prop_assert!(history.column(slot).contains(value));
            }
        }
    }
}

#[test]
fn sequential_reproduces_single_day() {
    let day: Vec<f64> = (0..SLOTS).map(|h| (h as f64 * 37.5) % 400.0).collect();
    let history = table(vec![day.clone()]);

    for method in [SamplingMethod::Stochastic, SamplingMethod::Bootstrap] {
        let mut rng = StdRng::seed_from_u64(123);
        let ensemble =
            generate_sequential_from_profiles(&history, key(), method, 0.95, 20, &mut rng)
                .unwrap()
                .unwrap();
        assert!(ensemble.runs().iter().all(|run| run == &day));
    }
}

#[test]
fn stochastic_zero_variance_slot_returns_mean() {
    let history = table(vec![vec![100.0; SLOTS]; 3]);
    let mut rng = StdRng::seed_from_u64(9);

    let ensemble = generate_stochastic(&history.describe(), key(), 5, &mut rng)
        .unwrap()
        .unwrap();
    for run in 0..5 {
        assert_eq!(ensemble.value(12, run), Some(100.0));
    }
}
