//! Core data types for voltlog-rs
//!
//! This module contains the data model shared by the parser, the writer and
//! the analysis routines.
//!
//! # Main Types
//!
//! - [`StartOfDay`] - Wall-clock time at which the instrument started recording
//! - [`RecordingHeader`] - The scalar fields at the top of a log
//! - [`VoltageReading`] - One timepoint line (resistor voltage, optional source voltage)
//! - [`SampleBlock`] - One acquisition burst with its explicit start time
//! - [`Event`] - A named marker in whole seconds from the recording start
//! - [`Recording`] - The assembled, read-only time series
//!
//! # Sample Clock
//!
//! Each block carries its own start time; timepoint `i` of a block sits at
//! `start_time + i / sampling_rate`. Block start times are taken from the
//! log as-is, so gaps between blocks survive into [`Recording::timepoints`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoltLogError};

/// Wall-clock time of day at which a recording started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl StartOfDay {
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// Whether the fields name a time of day on a 24-hour clock
    pub fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60 && self.second < 60
    }

    /// Seconds elapsed since midnight
    pub fn seconds_of_day(&self) -> u32 {
        self.hour * 60 * 60 + self.minute * 60 + self.second
    }
}

impl std::fmt::Display for StartOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Scalar fields read from the top of a log
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingHeader {
    /// Present only when the log starts with the `Start Hour` block
    pub start_time_of_day: Option<StartOfDay>,
    /// Number of acquisition blocks (N)
    pub sample_count: usize,
    /// Timepoints per block (P)
    pub points_per_sample: usize,
    /// Timepoints per second within a block
    pub sampling_rate: f64,
    /// Series resistor in ohms
    pub resistance: f64,
    /// Nominal supply voltage
    pub applied_voltage: f64,
}

/// A single timepoint line: `"<rv>"` or `"<rv>, <pv>"`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageReading {
    pub resistor: f64,
    pub power_source: Option<f64>,
}

impl VoltageReading {
    pub fn single(resistor: f64) -> Self {
        Self {
            resistor,
            power_source: None,
        }
    }

    pub fn pair(resistor: f64, power_source: f64) -> Self {
        Self {
            resistor,
            power_source: Some(power_source),
        }
    }
}

/// One acquisition burst
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBlock {
    /// Explicit start time in whole seconds from recording start
    pub start_time: u64,
    pub readings: Vec<VoltageReading>,
}

/// A named event marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    /// Whole seconds from recording start
    pub time: u64,
}

impl Event {
    pub fn new(name: impl Into<String>, time: u64) -> Self {
        Self {
            name: name.into(),
            time,
        }
    }
}

/// Borrowed view of one block of a [`Recording`]
#[derive(Debug, Clone, Copy)]
pub struct BlockView<'a> {
    pub index: usize,
    pub start_time: u64,
    pub timepoints: &'a [f64],
    pub resistor_voltages: &'a [f64],
    pub power_source_voltages: &'a [f64],
}

/// A fully parsed recording
///
/// Built once and read-only afterwards. All three sample arrays have
/// `sample_count * points_per_sample` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    header: RecordingHeader,
    block_starts: Vec<u64>,
    timepoints: Vec<f64>,
    resistor_voltages: Vec<f64>,
    power_source_voltages: Vec<f64>,
    has_power_source_column: bool,
    events: Vec<Event>,
}

impl Recording {
    /// Assemble a recording from a header, its blocks and the trailing events
    ///
    /// Fails if the start of day is not a valid time, if the header violates
    /// `sampling_rate > 0` / `resistance > 0`, or if the block count or any
    /// block length disagrees with the header.
    pub fn assemble(
        header: RecordingHeader,
        blocks: Vec<SampleBlock>,
        events: Vec<Event>,
    ) -> Result<Self> {
        if let Some(start) = header.start_time_of_day.filter(|s| !s.is_valid()) {
            return Err(VoltLogError::format(
                0,
                format!("start of day {} is not a valid time", start),
            ));
        }
        if !(header.sampling_rate.is_finite() && header.sampling_rate > 0.0) {
            return Err(VoltLogError::format(
                0,
                format!("sampling rate must be positive, got {}", header.sampling_rate),
            ));
        }
        if !(header.resistance.is_finite() && header.resistance > 0.0) {
            return Err(VoltLogError::format(
                0,
                format!("resistance must be positive, got {}", header.resistance),
            ));
        }
        if blocks.len() != header.sample_count {
            return Err(VoltLogError::format(
                0,
                format!(
                    "expected {} sample blocks, got {}",
                    header.sample_count,
                    blocks.len()
                ),
            ));
        }

        let total = header.sample_count * header.points_per_sample;
        let mut timepoints = Vec::with_capacity(total);
        let mut resistor_voltages = Vec::with_capacity(total);
        let mut power_source_voltages = Vec::with_capacity(total);
        let mut block_starts = Vec::with_capacity(blocks.len());
        let mut has_power_source_column = false;

        for (index, block) in blocks.into_iter().enumerate() {
            if block.readings.len() != header.points_per_sample {
                return Err(VoltLogError::format(
                    0,
                    format!(
                        "block {} has {} timepoints, expected {}",
                        index,
                        block.readings.len(),
                        header.points_per_sample
                    ),
                ));
            }

            block_starts.push(block.start_time);
            let start = block.start_time as f64;
            for (i, reading) in block.readings.into_iter().enumerate() {
                timepoints.push(start + i as f64 / header.sampling_rate);
                resistor_voltages.push(reading.resistor);
                match reading.power_source {
                    Some(v) => {
                        has_power_source_column = true;
                        power_source_voltages.push(v);
                    }
                    None => power_source_voltages.push(header.applied_voltage),
                }
            }
        }

        Ok(Self {
            header,
            block_starts,
            timepoints,
            resistor_voltages,
            power_source_voltages,
            has_power_source_column,
            events,
        })
    }

    pub fn header(&self) -> &RecordingHeader {
        &self.header
    }

    pub fn start_time_of_day(&self) -> Option<StartOfDay> {
        self.header.start_time_of_day
    }

    /// Start of day in seconds since midnight, 0 when the log had no header block
    pub fn start_seconds_of_day(&self) -> u32 {
        self.header
            .start_time_of_day
            .map(|s| s.seconds_of_day())
            .unwrap_or(0)
    }

    pub fn sample_count(&self) -> usize {
        self.header.sample_count
    }

    pub fn points_per_sample(&self) -> usize {
        self.header.points_per_sample
    }

    pub fn sampling_rate(&self) -> f64 {
        self.header.sampling_rate
    }

    pub fn resistance(&self) -> f64 {
        self.header.resistance
    }

    pub fn applied_voltage(&self) -> f64 {
        self.header.applied_voltage
    }

    /// `N * P / sampling_rate`; ignores any gaps between blocks
    pub fn total_duration(&self) -> f64 {
        (self.header.sample_count * self.header.points_per_sample) as f64
            / self.header.sampling_rate
    }

    pub fn timepoints(&self) -> &[f64] {
        &self.timepoints
    }

    pub fn resistor_voltages(&self) -> &[f64] {
        &self.resistor_voltages
    }

    pub fn power_source_voltages(&self) -> &[f64] {
        &self.power_source_voltages
    }

    /// Whether any timepoint line carried a measured source voltage
    pub fn has_power_source_column(&self) -> bool {
        self.has_power_source_column
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn block_start_times(&self) -> &[u64] {
        &self.block_starts
    }

    /// Number of timepoints across all blocks
    pub fn len(&self) -> usize {
        self.timepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timepoints.is_empty()
    }

    /// View of block `index`, if it exists
    pub fn block(&self, index: usize) -> Option<BlockView<'_>> {
        let start_time = *self.block_starts.get(index)?;
        let p = self.header.points_per_sample;
        let range = index * p..(index + 1) * p;
        Some(BlockView {
            index,
            start_time,
            timepoints: &self.timepoints[range.clone()],
            resistor_voltages: &self.resistor_voltages[range.clone()],
            power_source_voltages: &self.power_source_voltages[range],
        })
    }

    /// Iterate over all blocks in log order
    pub fn blocks(&self) -> impl Iterator<Item = BlockView<'_>> {
        (0..self.block_starts.len()).filter_map(move |i| self.block(i))
    }

    /// Current through the resistor in milliamps
    pub fn current_milliamps(&self) -> Vec<f64> {
        self.resistor_voltages
            .iter()
            .map(|v| v / self.header.resistance * 1000.0)
            .collect()
    }

    /// Instantaneous power in watts
    pub fn instantaneous_power(&self) -> Vec<f64> {
        self.power_source_voltages
            .iter()
            .zip(self.resistor_voltages.iter())
            .map(|(pv, rv)| pv * rv / self.header.resistance)
            .collect()
    }

    /// Current trace as `[time, mA]` pairs for plotting
    pub fn current_plot_points(&self) -> Vec<[f64; 2]> {
        self.timepoints
            .iter()
            .zip(self.current_milliamps())
            .map(|(&t, i)| [t, i])
            .collect()
    }

    /// Power trace as `[time, W]` pairs for plotting
    pub fn power_plot_points(&self) -> Vec<[f64; 2]> {
        self.timepoints
            .iter()
            .zip(self.instantaneous_power())
            .map(|(&t, p)| [t, p])
            .collect()
    }
}
