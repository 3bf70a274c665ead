//! Writer for instrument voltage logs
//!
//! Emits the same layout the acquisition program produces, so a parsed
//! recording can be re-serialized and synthetic logs can be generated for
//! tests and benchmarks.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Result, VoltLogError};
use crate::types::Recording;

use super::parser::{START_HOUR_KEY, START_MINUTE_KEY, START_SECOND_KEY};

/// Label written on the first line of every block
pub const BLOCK_LABEL: &str = "Start Time";

/// Writer for instrument voltage logs
pub struct LogWriter;

impl LogWriter {
    /// Render a recording as log text
    ///
    /// Blocks are written with two columns whenever the recording carried a
    /// measured source voltage; defaulted values then appear explicitly.
    pub fn render(recording: &Recording) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = Self::write_into(&mut out, recording);
        out
    }

    /// Write a recording to a file, creating parent directories as needed
    pub fn save(recording: &Recording, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    VoltLogError::Serialization(format!(
                        "Failed to create directory {:?}: {}",
                        parent, e
                    ))
                })?;
            }
        }

        std::fs::write(path, Self::render(recording)).map_err(|e| {
            VoltLogError::Serialization(format!("Failed to write log {:?}: {}", path, e))
        })?;

        tracing::debug!("Wrote {} timepoints to {:?}", recording.len(), path);
        Ok(())
    }

    fn write_into(out: &mut String, recording: &Recording) -> std::fmt::Result {
        let header = recording.header();
        if let Some(start) = header.start_time_of_day {
            writeln!(out, "{}: {}", START_HOUR_KEY, start.hour)?;
            writeln!(out, "{}: {}", START_MINUTE_KEY, start.minute)?;
            writeln!(out, "{}: {}", START_SECOND_KEY, start.second)?;
        }

        writeln!(out, "Samples: {}", header.sample_count)?;
        writeln!(out, "Data Points Per Sample: {}", header.points_per_sample)?;
        writeln!(out, "Sampling Rate: {}", header.sampling_rate)?;
        writeln!(out, "Resistance: {}", header.resistance)?;
        writeln!(out, "Applied Voltage: {}", header.applied_voltage)?;

        let two_columns = recording.has_power_source_column();
        for block in recording.blocks() {
            writeln!(out, "{}: {}", BLOCK_LABEL, block.start_time)?;
            for (rv, pv) in block
                .resistor_voltages
                .iter()
                .zip(block.power_source_voltages)
            {
                if two_columns {
                    writeln!(out, "{}, {}", rv, pv)?;
                } else {
                    writeln!(out, "{}", rv)?;
                }
            }
        }

        for event in recording.events() {
            writeln!(out, "{}: {}", event.name, event.time)?;
        }

        Ok(())
    }
}
