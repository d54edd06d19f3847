//! Energy yield of a PV system driven by an irradiance series.
//!
//! The electrical physics (single-diode solution and inverter efficiency) stay behind the
//! [`DiodeModel`] and [`InverterModel`] traits; this module scales the module output to the
//! array, applies DC losses, converts to AC and integrates over time.

use super::MetricsError;
use crate::domain::Resolution;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// CEC single-diode parameters of one module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleParameters {
    /// Short-circuit current temperature coefficient (A/°C)
    pub alpha_sc: f64,
    /// Modified ideality factor at reference conditions (V)
    pub a_ref: f64,
    /// Light-generated current at reference conditions (A)
    pub i_l_ref: f64,
    /// Diode saturation current at reference conditions (A)
    pub i_o_ref: f64,
    /// Shunt resistance at reference conditions (Ω)
    pub r_sh_ref: f64,
    /// Series resistance (Ω)
    pub r_s: f64,
    /// Temperature coefficient adjustment (%)
    pub adjust: f64,
}

/// Sandia inverter model coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverterParameters {
    pub paco: f64,
    pub pdco: f64,
    pub vdco: f64,
    pub pso: f64,
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub pnt: f64,
}

/// Maximum power point of one module
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaxPowerPoint {
    pub i_mp: f64,
    pub v_mp: f64,
    pub p_mp: f64,
}

/// Solves the single-diode equation of a module.
#[cfg_attr(test, mockall::automock)]
pub trait DiodeModel {
    fn max_power_point(
        &self,
        irradiance: f64,
        cell_temperature: f64,
        module: &ModuleParameters,
    ) -> MaxPowerPoint;
}

/// Converts DC input to AC output.
#[cfg_attr(test, mockall::automock)]
pub trait InverterModel {
    fn ac_power(&self, v_dc: f64, p_dc: f64, inverter: &InverterParameters) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayLayout {
    pub modules_per_string: u32,
    pub strings_per_inverter: u32,
}

/// Module, inverter and wiring of the evaluated system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvSystem {
    pub module: ModuleParameters,
    pub inverter: InverterParameters,
    pub layout: ArrayLayout,
    /// DC wiring and mismatch loss (%)
    pub dc_loss_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyYield {
    /// Energy over the whole series (Wh)
    pub total_wh: f64,
    /// AC power per timestamp, never negative (W)
    pub ac_power_w: Vec<f64>,
}

/// Estimates the AC energy produced from irradiance and module temperature.
pub fn energy_yield(
    irradiance: &[f64],
    module_temperature: &[f64],
    resolution: Resolution,
    system: &PvSystem,
    diode: &dyn DiodeModel,
    inverter: &dyn InverterModel,
) -> Result<EnergyYield, MetricsError> {
    super::ensure_same_length(irradiance, module_temperature)?;
    if !(0.0..=100.0).contains(&system.dc_loss_percent) {
        return Err(MetricsError::InvalidInput(format!(
            "DC loss {}% is outside [0, 100]",
            system.dc_loss_percent
        )));
    }

    let strings = f64::from(system.layout.strings_per_inverter);
    let modules = f64::from(system.layout.modules_per_string);
    let retained = 1.0 - system.dc_loss_percent / 100.0;

    let ac_power_w: Vec<f64> = irradiance
        .iter()
        .zip(module_temperature)
        .map(|(g, t)| {
            let mpp = diode.max_power_point(*g, *t, &system.module);
            // Loss applies to current and power; string voltage is unaffected
            let v_dc = mpp.v_mp * modules;
            let p_dc = mpp.p_mp * strings * modules * retained;
            inverter.ac_power(v_dc, p_dc, &system.inverter).max(0.0)
        })
        .collect();

    let total_wh = ac_power_w.iter().sum::<f64>() * resolution.hours();

    debug!(
        samples = ac_power_w.len(),
        %resolution,
        total_wh,
        "estimated energy yield"
    );

    Ok(EnergyYield {
        total_wh,
        ac_power_w,
    })
}
