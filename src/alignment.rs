//! Alignment of wall-clock timestamps to recording time
//!
//! External logs stamp their rows with `HH:MM:SS` strings at one-second
//! resolution. Converting them to seconds since the recording's start of
//! day lets them share an axis with [`Recording::timepoints`]. Rows that
//! repeat the previous row's second are spread out by a fixed jitter step so
//! they do not stack on the same instant.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoltLogError};
use crate::types::Recording;

/// Offset added per repeated second
pub const DEFAULT_JITTER_STEP: f64 = 0.2;

/// Timestamp format accepted by the aligner
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Time alignment configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Seconds added for each successive row sharing the previous row's second
    #[serde(default = "default_jitter_step")]
    pub jitter_step: f64,
}

fn default_jitter_step() -> f64 {
    DEFAULT_JITTER_STEP
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            jitter_step: DEFAULT_JITTER_STEP,
        }
    }
}

/// Running state of the de-jitter fold
#[derive(Debug, Clone, Copy, Default)]
struct JitterState {
    last_second: Option<u32>,
    offset: f64,
}

/// Converts `HH:MM:SS` strings to local recording seconds
#[derive(Debug, Clone, Default)]
pub struct TimeAligner {
    config: AlignmentConfig,
}

impl TimeAligner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AlignmentConfig) -> Self {
        Self { config }
    }

    /// Align timestamps against a program start given in seconds of day
    ///
    /// `local[i] = hh*3600 + mm*60 + ss - program_start + offset`, where the
    /// offset grows by the jitter step while the seconds field repeats and
    /// drops back to 0 when it changes.
    pub fn align<S: AsRef<str>>(&self, stamps: &[S], program_start: u32) -> Result<Vec<f64>> {
        let step = self.config.jitter_step;

        let (local, _) = stamps.iter().enumerate().try_fold(
            (Vec::with_capacity(stamps.len()), JitterState::default()),
            |(mut local, state), (index, stamp)| {
                let time = parse_timestamp(stamp.as_ref(), index)?;
                let second = time.second();

                let offset = if state.last_second == Some(second) {
                    state.offset + step
                } else {
                    0.0
                };
                let base = time.num_seconds_from_midnight() as f64 - program_start as f64;
                local.push(base + offset);

                Ok::<_, VoltLogError>((
                    local,
                    JitterState {
                        last_second: Some(second),
                        offset,
                    },
                ))
            },
        )?;

        Ok(local)
    }

    /// Align timestamps against a recording's own start of day
    pub fn align_to<S: AsRef<str>>(
        &self,
        stamps: &[S],
        recording: &Recording,
    ) -> Result<Vec<f64>> {
        self.align(stamps, recording.start_seconds_of_day())
    }
}

fn parse_timestamp(stamp: &str, index: usize) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(stamp.trim(), TIMESTAMP_FORMAT).map_err(|e| {
        VoltLogError::format(index + 1, format!("invalid timestamp `{}`: {}", stamp, e))
    })
}
