//! Error handling for voltlog-rs
//!
//! This module defines the crate error type and a Result alias used
//! throughout the parser and the analysis routines.

use thiserror::Error;

/// Main error type for voltlog-rs operations
#[derive(Error, Debug)]
pub enum VoltLogError {
    /// Malformed or truncated log text
    #[error("Format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// The recording holds no samples, so duration and period are undefined
    #[error("Recording contains no samples")]
    EmptyRecording,

    /// Numeric failures such as division by a zero duration
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<VoltLogError>,
    },
}

impl VoltLogError {
    /// Create a format error for a 1-based line number
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        VoltLogError::Format {
            line,
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        VoltLogError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) is a format error
    pub fn is_format(&self) -> bool {
        match self {
            VoltLogError::Format { .. } => true,
            VoltLogError::WithContext { source, .. } => source.is_format(),
            _ => false,
        }
    }
}

/// Result type alias for voltlog-rs operations
pub type Result<T> = std::result::Result<T, VoltLogError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
