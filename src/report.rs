//! Textual and JSON summaries of an analyzed recording

use serde::{Deserialize, Serialize};

use crate::analysis::{compute_energy, EnergyUsage, PeriodEstimate};
use crate::config::AnalysisConfig;
use crate::error::{Result, VoltLogError};
use crate::types::{Event, Recording, StartOfDay};

/// Analysis results for one log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Label of the analyzed log, usually its path
    pub source: String,
    pub start_time_of_day: Option<StartOfDay>,
    pub events: Vec<Event>,
    pub energy: EnergyUsage,
    pub period: PeriodEstimate,
}

impl Report {
    /// Run both analyses over a recording
    pub fn build(
        source: impl Into<String>,
        recording: &Recording,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let energy = compute_energy(recording)?;
        let period = config.peak_analyzer().detect_period(recording)?;

        Ok(Self {
            source: source.into(),
            start_time_of_day: recording.start_time_of_day(),
            events: recording.events().to_vec(),
            energy,
            period,
        })
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VoltLogError::Serialization(format!("Failed to serialize report: {}", e)))
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "File {} events", self.source)?;
        for event in &self.events {
            writeln!(f, "{} at time {}s", event.name, event.time)?;
        }
        writeln!(
            f,
            "Energy Usage: {}J used over a {}s time span",
            decimal(self.energy.energy_joules),
            decimal(self.energy.duration_seconds)
        )?;
        writeln!(
            f,
            "Average Power: {}W",
            decimal(self.energy.average_power_watts)
        )?;

        match (self.period.period, self.period.status.reason_code()) {
            (Some(period), _) => writeln!(f, "Period: {}s", decimal(period)),
            (None, Some(code)) => writeln!(f, "no period detected ({})", code),
            (None, None) => writeln!(f, "no period detected"),
        }
    }
}

/// Float text that keeps a `.0` on integral values
fn decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
