//! # voltlog-rs: Voltage-Clamp Log Analysis
//!
//! Reads the text log written by a voltage-clamp acquisition program,
//! rebuilds the sampled resistor and power-source voltages on their own
//! clock, and derives two summaries: the dominant stimulation period and
//! the energy delivered over the recording.
//!
//! ## Architecture
//!
//! - **Log format**: Parser and writer for the instrument's line-oriented log
//! - **Analysis**: Peak/period detection and energy accounting
//! - **Alignment**: Conversion of external `HH:MM:SS` stamps to recording time
//! - **Report**: Text and JSON summaries
//!
//! ## Example
//!
//! ```ignore
//! use voltlog_rs::{AnalysisConfig, LogParser, Report};
//!
//! fn main() -> voltlog_rs::Result<()> {
//!     let recording = LogParser::parse("run_01.txt")?;
//!     let report = Report::build("run_01.txt", &recording, &AnalysisConfig::default())?;
//!     print!("{}", report);
//!     Ok(())
//! }
//! ```

pub mod alignment;
pub mod analysis;
pub mod config;
pub mod error;
pub mod log_format;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use alignment::{AlignmentConfig, TimeAligner};
pub use analysis::{
    compute_energy, EnergyUsage, PeakAnalyzer, PeakConfig, PeriodEstimate, PeriodStatus,
};
pub use config::{AnalysisConfig, OutputFormat};
pub use error::{Result, VoltLogError};
pub use log_format::{LogParser, LogWriter};
pub use report::Report;
pub use types::{Event, Recording, RecordingHeader, SampleBlock, StartOfDay, VoltageReading};
