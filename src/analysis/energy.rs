//! Energy accounting over a recording
//!
//! Integrates `source_voltage * resistor_voltage / resistance` over all
//! timepoints with a fixed `1 / sampling_rate` step.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoltLogError};
use crate::types::Recording;

/// Energy delivered over a recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyUsage {
    pub energy_joules: f64,
    pub average_power_watts: f64,
    /// `N * P / sampling_rate`
    pub duration_seconds: f64,
}

/// Compute total energy and average power
///
/// Falls back to the applied voltage when the recording has no source
/// voltages. Fails with an arithmetic error when the duration is zero.
pub fn compute_energy(recording: &Recording) -> Result<EnergyUsage> {
    let rv = recording.resistor_voltages();
    let pv = recording.power_source_voltages();

    let weighted: f64 = if pv.is_empty() {
        rv.iter().map(|v| recording.applied_voltage() * v).sum()
    } else {
        pv.iter().zip(rv).map(|(p, r)| p * r).sum()
    };
    let energy_joules = weighted / recording.resistance() / recording.sampling_rate();

    let duration_seconds = recording.total_duration();
    if duration_seconds == 0.0 {
        return Err(VoltLogError::Arithmetic(
            "division by zero: recording duration is 0 s".to_string(),
        ));
    }

    let usage = EnergyUsage {
        energy_joules,
        average_power_watts: energy_joules / duration_seconds,
        duration_seconds,
    };
    tracing::debug!(
        "Energy {} J over {} s ({} W)",
        usage.energy_joules,
        usage.duration_seconds,
        usage.average_power_watts
    );
    Ok(usage)
}
