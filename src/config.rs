use crate::domain::Location;
use crate::generation::{Algorithm, AlgorithmKind, SamplingMethod};
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "SOLAR_SYNTH__";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub location: Location,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub generation: GenerationConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// JSON array of `{ "timestamp": ..., "<column>": ... }` records
    pub path: PathBuf,
    #[serde(default = "default_column")]
    pub column: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub algorithm: AlgorithmKind,
    /// Sampling of the sequential generator
    #[serde(default = "default_method")]
    pub method: SamplingMethod,
    pub runs: usize,
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    pub random_seed: Option<u64>,
}

impl GenerationConfig {
    pub fn algorithm(&self) -> Algorithm {
        match self.algorithm {
            AlgorithmKind::Stochastic => Algorithm::Stochastic,
            AlgorithmKind::Bootstrap => Algorithm::Bootstrap,
            AlgorithmKind::Sequential => Algorithm::Sequential {
                method: self.method,
                confidence_level: self.confidence_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: default_json(),
        }
    }
}

fn default_column() -> String {
    "ghi".to_string()
}

fn default_method() -> SamplingMethod {
    SamplingMethod::Stochastic
}

fn default_confidence_level() -> f64 {
    0.95
}

fn default_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    true
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads a TOML file overridden by `SOLAR_SYNTH__` environment variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(figment)
            .with_context(|| format!("loading configuration from {}", path.as_ref().display()))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.location.validate()?;
        if self.generation.runs == 0 {
            bail!("generation.runs must be at least 1");
        }
        let confidence_level = self.generation.confidence_level;
        if self.generation.algorithm == AlgorithmKind::Sequential
            && !(confidence_level > 0.0 && confidence_level < 1.0)
        {
            bail!("generation.confidence_level {confidence_level} is outside (0, 1)");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;

    const SAMPLE: &str = r#"
        [location]
        latitude = 40.4
        longitude = -3.7
        altitude = 667.0
        time_zone = "Europe/Madrid"

        [input]
        path = "data/madrid.json"

        [output]
        path = "out/ensembles.json"

        [generation]
        algorithm = "sequential"
        method = "bootstrap"
        runs = 25
        confidence_level = 0.9
        random_seed = 42
    "#;

    fn parse(toml: &str) -> Result<Config> {
        Config::extract(Figment::from(Toml::string(toml)))
    }

    #[test]
    fn test_parse_sample() {
        let config = parse(SAMPLE).unwrap();

        assert_eq!(config.location.time_zone, Tz::Europe__Madrid);
        assert_eq!(config.input.column, "ghi");
        assert_eq!(config.generation.random_seed, Some(42));
        assert_eq!(config.telemetry.level, "info");
        assert!(config.telemetry.json);
        assert_eq!(
            config.generation.algorithm(),
            Algorithm::Sequential {
                method: SamplingMethod::Bootstrap,
                confidence_level: 0.9
            }
        );
    }

    #[test]
    fn test_rejects_unknown_algorithm() {
        let toml = SAMPLE.replace("\"sequential\"", "\"markov\"");
        let err = parse(&toml).unwrap_err();
        assert!(err.to_string().contains("markov"), "{err}");
    }

    #[test]
    fn test_algorithm_is_case_sensitive_lowercase() {
        let toml = SAMPLE.replace("\"sequential\"", "\"Bootstrap\"");
        assert!(parse(&toml).is_err());

        let toml = SAMPLE.replace("\"sequential\"", "\"bootstrap\"");
        assert_eq!(parse(&toml).unwrap().generation.algorithm(), Algorithm::Bootstrap);
    }

    #[test]
    fn test_rejects_confidence_outside_unit_interval() {
        let toml = SAMPLE.replace("confidence_level = 0.9", "confidence_level = 1.5");
        assert!(parse(&toml).is_err());
    }

    #[test]
    fn test_rejects_zero_runs() {
        let toml = SAMPLE.replace("runs = 25", "runs = 0");
        assert!(parse(&toml).is_err());
    }

    #[test]
    fn test_rejects_invalid_time_zone() {
        let toml = SAMPLE.replace("Europe/Madrid", "Mars/Olympus");
        assert!(parse(&toml).is_err());
    }
}
