//! Configuration module for voltlog-rs
//!
//! This module holds the tunable constants of the analysis routines. The
//! defaults reproduce the fixed policy of the acquisition tooling, so an
//! absent or empty config file changes nothing.
//!
//! # Files
//!
//! - `voltlog.toml` - Read from the working directory by the command-line tool
//!
//! # Example
//!
//! ```toml
//! output = "json"
//!
//! [peaks]
//! threshold_ratio = 0.4
//! cooldown = 10
//!
//! [alignment]
//! jitter_step = 0.2
//! ```

use crate::alignment::{AlignmentConfig, TimeAligner};
use crate::analysis::{PeakAnalyzer, PeakConfig};
use crate::error::{Result, VoltLogError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config filename looked up by the command-line tool
pub const CONFIG_FILE: &str = "voltlog.toml";

/// Analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Report format
    #[serde(default)]
    pub output: OutputFormat,

    /// Peak detector settings
    #[serde(default)]
    pub peaks: PeakConfig,

    /// Timestamp alignment settings
    #[serde(default)]
    pub alignment: AlignmentConfig,
}

impl AnalysisConfig {
    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            VoltLogError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_toml(&content).map_err(|e| e.with_context(format!("{:?}", path)))
    }

    /// Load a config file, returning defaults if it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Parse a config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| VoltLogError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| VoltLogError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            VoltLogError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Peak analyzer using the `[peaks]` settings
    pub fn peak_analyzer(&self) -> PeakAnalyzer {
        PeakAnalyzer::with_config(self.peaks)
    }

    /// Time aligner using the `[alignment]` settings
    pub fn time_aligner(&self) -> TimeAligner {
        TimeAligner::with_config(self.alignment)
    }

    fn validate(&self) -> Result<()> {
        if !(self.peaks.threshold_ratio.is_finite() && self.peaks.threshold_ratio > 0.0) {
            return Err(VoltLogError::Config(format!(
                "peaks.threshold_ratio must be positive, got {}",
                self.peaks.threshold_ratio
            )));
        }
        if !(self.alignment.jitter_step.is_finite() && self.alignment.jitter_step >= 0.0) {
            return Err(VoltLogError::Config(format!(
                "alignment.jitter_step must not be negative, got {}",
                self.alignment.jitter_step
            )));
        }
        Ok(())
    }
}

/// Format of printed reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text, one line per quantity
    #[default]
    Text,
    /// Pretty-printed JSON object per log
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "Text"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

// ==================== Tests ====================
