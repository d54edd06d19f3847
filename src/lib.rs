//! Synthetic solar irradiance generation.
//!
//! Measured irradiance is normalised against a clear-sky model, days are bucketed into five
//! sky conditions by their median clearness index, and each (year, month, sky condition)
//! slice feeds one of three generators producing ensembles of synthetic daily profiles.
//! The [`metrics`] module compares generated and measured data.

pub mod clearsky;
pub mod config;
pub mod domain;
pub mod error;
pub mod generation;
pub mod input;
pub mod metrics;
pub mod telemetry;

pub use error::{Result, SynthError};
