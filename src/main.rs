use anyhow::{Context, Result};
use solar_synth::clearsky::{clear_sky_index, ClearSkyModel};
use solar_synth::config::Config;
use solar_synth::domain::EnsembleSet;
use solar_synth::generation::SyntheticGenerator;
use solar_synth::input::read_series;
use solar_synth::telemetry::init_tracing;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use strum::IntoEnumIterator;
use tracing::info;

fn main() -> Result<()> {
    let cfg = Config::load()?;
    init_tracing(&cfg.telemetry);

    let algorithm = cfg.generation.algorithm();
    let column = cfg.input.column.as_str();

    let file = File::open(&cfg.input.path)
        .with_context(|| format!("opening input {}", cfg.input.path.display()))?;
    let series = read_series(BufReader::new(file), column)?;
    info!(
        samples = series.len(),
        path = %cfg.input.path.display(),
        "loaded input series"
    );

    let clearness = clear_sky_index(&series, column, &cfg.location, &ClearSkyModel::default())?;

    let mut generator = SyntheticGenerator::new(cfg.generation.random_seed);
    let mut ensembles = EnsembleSet::new();
    let months = series.months();
    for &(year, month) in &months {
        let generated = generator.generate_month(
            &clearness,
            column,
            year,
            month,
            algorithm,
            cfg.generation.runs,
        )?;
        ensembles.extend(generated);
    }

    let output: BTreeMap<String, _> = ensembles
        .values()
        .map(|ensemble| (ensemble.label(), ensemble))
        .collect();

    let file = File::create(&cfg.output.path)
        .with_context(|| format!("creating output {}", cfg.output.path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &output)?;

    let slices = months.len() * solar_synth::domain::SkyCondition::iter().count();
    info!(
        %algorithm,
        generated = output.len(),
        skipped = slices - output.len(),
        path = %cfg.output.path.display(),
        "wrote synthetic ensembles"
    );
    Ok(())
}
