//! Analysis module for parsed recordings
//!
//! This module provides the two summaries derived from a recording:
//! - Peak detection and stimulation period estimation
//! - Energy usage and average power

pub mod energy;
pub mod peaks;

pub use energy::{compute_energy, EnergyUsage};
pub use peaks::{PeakAnalyzer, PeakConfig, PeriodEstimate, PeriodStatus};
