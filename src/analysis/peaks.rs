//! Peak detection and stimulation period estimation
//!
//! Finds clusters of above-threshold resistor voltage and turns the index
//! distance between successive cluster starts into gaps in seconds. The
//! period is the mean of the gaps that sit close to the overall mean.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoltLogError};
use crate::types::Recording;

/// Fraction of the peak resistor voltage used as detection threshold
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.4;

/// Minimum index distance between two peak starts
pub const DEFAULT_COOLDOWN: usize = 10;

/// Peak detector configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakConfig {
    /// Threshold as a fraction of the maximum resistor voltage
    #[serde(default = "default_threshold_ratio")]
    pub threshold_ratio: f64,
    /// Cooldown in timepoint indices (not seconds)
    #[serde(default = "default_cooldown")]
    pub cooldown: usize,
}

fn default_threshold_ratio() -> f64 {
    DEFAULT_THRESHOLD_RATIO
}

fn default_cooldown() -> usize {
    DEFAULT_COOLDOWN
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

/// Outcome of a period search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// A period was found
    Ok,
    /// No two peak starts were more than `cooldown` apart
    NoPeriodNoGaps,
    /// Gaps were found but none lay within the variance window of the mean
    NoPeriodNoConsistentGaps,
}

impl PeriodStatus {
    /// Short reason code used in textual reports
    pub fn reason_code(&self) -> Option<&'static str> {
        match self {
            PeriodStatus::Ok => None,
            PeriodStatus::NoPeriodNoConsistentGaps => Some("a"),
            PeriodStatus::NoPeriodNoGaps => Some("b"),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PeriodStatus::Ok => "ok",
            PeriodStatus::NoPeriodNoGaps => "no period (no gaps)",
            PeriodStatus::NoPeriodNoConsistentGaps => "no period (no consistent gaps)",
        }
    }
}

/// Result of [`PeakAnalyzer::detect_period`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEstimate {
    /// Estimated period in seconds
    pub period: Option<f64>,
    pub status: PeriodStatus,
    /// Absolute threshold the resistor voltage was compared against
    pub threshold: f64,
    /// Number of gaps collected
    pub gap_count: usize,
    /// Number of gaps that contributed to the period
    pub consistent_gap_count: usize,
}

/// Peak/period analyzer
#[derive(Debug, Clone, Default)]
pub struct PeakAnalyzer {
    config: PeakConfig,
}

impl PeakAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PeakConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PeakConfig {
        &self.config
    }

    /// Estimate the stimulation period of a recording
    ///
    /// The mask is taken over the whole resistor-voltage array, but every
    /// one of the `sample_count` scans walks indices `0..points_per_sample`,
    /// so each scan sees the first block and contributes the same gaps.
    /// The repetition does not change the mean, the variance or which gaps
    /// count as consistent.
    pub fn detect_period(&self, recording: &Recording) -> Result<PeriodEstimate> {
        let voltages = recording.resistor_voltages();
        if voltages.is_empty() {
            return Err(VoltLogError::EmptyRecording);
        }

        // NaN poisons the maximum, so no index clears the threshold
        let max = voltages.iter().copied().fold(f64::NEG_INFINITY, |max, v| {
            if max.is_nan() || v.is_nan() {
                f64::NAN
            } else {
                max.max(v)
            }
        });
        let threshold = max * self.config.threshold_ratio;
        let mask: Vec<bool> = voltages.iter().map(|&v| v >= threshold).collect();

        let window = &mask[..recording.points_per_sample().min(mask.len())];
        let mut gaps = Vec::new();
        for _ in 0..recording.sample_count() {
            gaps.extend(
                scan_gaps(window, self.config.cooldown)
                    .into_iter()
                    .map(|d| d as f64 / recording.sampling_rate()),
            );
        }

        let estimate = summarize_gaps(&gaps, threshold);
        tracing::debug!(
            "Peak scan: threshold {:.6}, {} gaps, {} consistent, {}",
            threshold,
            estimate.gap_count,
            estimate.consistent_gap_count,
            estimate.status.display_name()
        );
        Ok(estimate)
    }
}

/// Index distances between successive qualifying peak starts
///
/// A start is only closed by a later above-threshold index more than
/// `cooldown` away; dropping below threshold does not reset it.
pub fn scan_gaps(mask: &[bool], cooldown: usize) -> Vec<usize> {
    let mut gaps = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &above) in mask.iter().enumerate() {
        if !above {
            continue;
        }
        match start {
            None => start = Some(i),
            Some(s) if i - s > cooldown => {
                gaps.push(i - s);
                start = Some(i);
            }
            Some(_) => {}
        }
    }

    gaps
}

/// Reduce gaps (in seconds) to a period estimate
///
/// Consistent gaps satisfy `|gap - mean| < variance`, using the population
/// variance itself as the window.
pub fn summarize_gaps(gaps: &[f64], threshold: f64) -> PeriodEstimate {
    if gaps.is_empty() {
        return PeriodEstimate {
            period: None,
            status: PeriodStatus::NoPeriodNoGaps,
            threshold,
            gap_count: 0,
            consistent_gap_count: 0,
        };
    }

    let n = gaps.len() as f64;
    let mean = gaps.iter().sum::<f64>() / n;
    let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n;

    let consistent: Vec<f64> = gaps
        .iter()
        .copied()
        .filter(|g| (g - mean).abs() < variance)
        .collect();

    let (period, status) = if consistent.is_empty() {
        (None, PeriodStatus::NoPeriodNoConsistentGaps)
    } else {
        let period = consistent.iter().sum::<f64>() / consistent.len() as f64;
        (Some(period), PeriodStatus::Ok)
    };

    PeriodEstimate {
        period,
        status,
        threshold,
        gap_count: gaps.len(),
        consistent_gap_count: consistent.len(),
    }
}
