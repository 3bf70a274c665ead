//! Instrument log format
//!
//! This module reads and writes the line-oriented text log produced by the
//! acquisition program:
//!
//! ```text
//! [Start Hour: <int>]          optional, all three or none
//! [Start Minute: <int>]
//! [Start Second: <int>]
//! Samples: <int>               N
//! Data Points Per Sample: <int> P
//! Sampling Rate: <float>
//! Resistance: <float>
//! Applied Voltage: <float>
//! Start Time: <int>            repeated N times, each followed by P lines
//! <rv> | <rv>, <pv>
//! <event name>: <int>          trailing lines, last line excluded
//! ```

pub mod parser;
pub mod writer;

pub use parser::LogParser;
pub use writer::LogWriter;
