//! Parser for instrument voltage logs
//!
//! The log is line oriented and position based: an optional three-line
//! start-of-day header, five scalar fields, `N` blocks of `1 + P` lines, and
//! trailing event lines. Every field line uses `Key: value`.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, ResultExt, VoltLogError};
use crate::types::{Event, Recording, RecordingHeader, SampleBlock, StartOfDay, VoltageReading};

/// Key of the first header line; its presence switches on the 3-line header
pub const START_HOUR_KEY: &str = "Start Hour";
pub const START_MINUTE_KEY: &str = "Start Minute";
pub const START_SECOND_KEY: &str = "Start Second";

/// Accepted keys for each scalar field, compared case-insensitively
pub const SAMPLE_COUNT_KEYS: &[&str] = &["Samples", "Number of Samples"];
pub const POINTS_PER_SAMPLE_KEYS: &[&str] = &[
    "Data Points Per Sample",
    "Timepoints per Sample",
    "Points per Sample",
];
pub const SAMPLING_RATE_KEYS: &[&str] = &["Sampling Rate"];
pub const RESISTANCE_KEYS: &[&str] = &["Resistance"];
pub const APPLIED_VOLTAGE_KEYS: &[&str] = &["Applied Voltage"];

/// Separator between a key and its value
const KEY_SEPARATOR: &str = ": ";
/// Separator between the two voltages on a timepoint line
const VALUE_SEPARATOR: &str = ", ";
/// Lines taken by the five scalar fields
const SCALAR_LINES: usize = 5;

/// Parser for instrument voltage logs
pub struct LogParser;

impl LogParser {
    /// Parse a log file from a path
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Recording> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(VoltLogError::from)
            .with_context(|| format!("Failed to read log {}", path.display()))?;

        tracing::info!("File {} events", path.display());
        Self::parse_str(&text).with_context(|| format!("Failed to parse log {}", path.display()))
    }

    /// Parse log text that is already in memory
    pub fn parse_str(text: &str) -> Result<Recording> {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        let lines = Lines(&lines);

        let (start_time_of_day, offset) = Self::parse_start_of_day(&lines)?;
        let header = RecordingHeader {
            start_time_of_day,
            sample_count: lines.number(offset, SAMPLE_COUNT_KEYS)?,
            points_per_sample: lines.number(offset + 1, POINTS_PER_SAMPLE_KEYS)?,
            sampling_rate: lines.number(offset + 2, SAMPLING_RATE_KEYS)?,
            resistance: lines.number(offset + 3, RESISTANCE_KEYS)?,
            applied_voltage: lines.number(offset + 4, APPLIED_VOLTAGE_KEYS)?,
        };
        Self::validate_header(&header, offset)?;

        let first_block = offset + SCALAR_LINES;
        let block_lines = header.points_per_sample.saturating_add(1);
        let events_start = header
            .sample_count
            .checked_mul(block_lines)
            .and_then(|n| n.checked_add(first_block))
            .filter(|&end| end <= lines.len())
            .ok_or_else(|| {
                VoltLogError::format(
                    lines.len(),
                    format!(
                        "log is truncated: {} blocks of {} timepoints do not fit in {} lines",
                        header.sample_count,
                        header.points_per_sample,
                        lines.len()
                    ),
                )
            })?;

        let blocks = (0..header.sample_count)
            .map(|s| {
                Self::parse_block(&lines, first_block + s * block_lines, header.points_per_sample)
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            "Parsed {} blocks of {} timepoints",
            blocks.len(),
            header.points_per_sample
        );

        let events = Self::parse_events(&lines, events_start)?;

        Recording::assemble(header, blocks, events)
    }

    /// Detect the optional `Start Hour` / `Start Minute` / `Start Second` block
    fn parse_start_of_day(lines: &Lines<'_>) -> Result<(Option<StartOfDay>, usize)> {
        let first_key = lines
            .get(0)
            .and_then(|l| l.split_once(KEY_SEPARATOR))
            .map(|(key, _)| key);
        if first_key != Some(START_HOUR_KEY) {
            return Ok((None, 0));
        }

        let start = StartOfDay {
            hour: lines.number(0, &[START_HOUR_KEY])?,
            minute: lines.number(1, &[START_MINUTE_KEY])?,
            second: lines.number(2, &[START_SECOND_KEY])?,
        };

        let fields = [
            (START_HOUR_KEY, start.hour, 24),
            (START_MINUTE_KEY, start.minute, 60),
            (START_SECOND_KEY, start.second, 60),
        ];
        for (index, (key, value, limit)) in fields.into_iter().enumerate() {
            if value >= limit {
                return Err(VoltLogError::format(
                    index + 1,
                    format!("`{}` must be below {}, got {}", key, limit, value),
                ));
            }
        }
        Ok((Some(start), 3))
    }

    fn validate_header(header: &RecordingHeader, offset: usize) -> Result<()> {
        if !(header.sampling_rate.is_finite() && header.sampling_rate > 0.0) {
            return Err(VoltLogError::format(
                offset + 3,
                format!("sampling rate must be positive, got {}", header.sampling_rate),
            ));
        }
        if !(header.resistance.is_finite() && header.resistance > 0.0) {
            return Err(VoltLogError::format(
                offset + 4,
                format!("resistance must be positive, got {}", header.resistance),
            ));
        }
        Ok(())
    }

    /// Parse one `<label>: <start>` line and the `points` lines after it
    fn parse_block(lines: &Lines<'_>, index: usize, points: usize) -> Result<SampleBlock> {
        let (_, start) = lines.field(index)?;
        let start_time = parse_value(start, index)?;

        let readings = (index + 1..index + 1 + points)
            .map(|i| Self::parse_reading(lines.require(i)?, i))
            .collect::<Result<Vec<_>>>()?;

        Ok(SampleBlock {
            start_time,
            readings,
        })
    }

    fn parse_reading(line: &str, index: usize) -> Result<VoltageReading> {
        let values: Vec<&str> = line.split(VALUE_SEPARATOR).collect();
        match values.as_slice() {
            [resistor] => Ok(VoltageReading::single(parse_value(resistor, index)?)),
            [resistor, source] => Ok(VoltageReading::pair(
                parse_value(resistor, index)?,
                parse_value(source, index)?,
            )),
            _ => Err(VoltLogError::format(
                index + 1,
                format!("expected 1 or 2 voltages, found {}", values.len()),
            )),
        }
    }

    /// Event lines run from `start` up to, but not including, the last line
    fn parse_events(lines: &Lines<'_>, start: usize) -> Result<Vec<Event>> {
        let end = lines.len().saturating_sub(1);
        let mut events = Vec::new();

        for index in start..end {
            if lines.require(index)?.trim().is_empty() {
                continue;
            }
            let (name, time) = lines.field(index)?;
            let time: u64 = parse_value(time, index)?;
            tracing::debug!("{} at time {}s", name, time);
            events.push(Event::new(name, time));
        }

        Ok(events)
    }
}

/// Line table with 1-based line numbers in errors
struct Lines<'a>(&'a [&'a str]);

impl<'a> Lines<'a> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, index: usize) -> Option<&'a str> {
        self.0.get(index).copied()
    }

    fn require(&self, index: usize) -> Result<&'a str> {
        self.get(index)
            .ok_or_else(|| VoltLogError::format(index + 1, "unexpected end of log"))
    }

    /// Split a `Key: value` line
    fn field(&self, index: usize) -> Result<(&'a str, &'a str)> {
        self.require(index)?
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| {
                VoltLogError::format(index + 1, format!("expected `Key{}value`", KEY_SEPARATOR))
            })
    }

    /// Read a `Key: value` line whose key is one of `keys`
    fn number<T>(&self, index: usize, keys: &[&str]) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let expected = keys.first().copied().unwrap_or_default();
        let line = self.get(index).ok_or_else(|| {
            VoltLogError::format(index + 1, format!("missing `{}` line", expected))
        })?;
        let (key, value) = line.split_once(KEY_SEPARATOR).ok_or_else(|| {
            VoltLogError::format(
                index + 1,
                format!("expected `{}{}<value>`", expected, KEY_SEPARATOR),
            )
        })?;

        let key = key.trim();
        if !keys.iter().any(|k| k.eq_ignore_ascii_case(key)) {
            return Err(VoltLogError::format(
                index + 1,
                format!("expected `{}`, found `{}`", expected, key),
            ));
        }

        parse_value(value, index)
    }
}

fn parse_value<T>(value: &str, index: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = value.trim();
    value.parse().map_err(|e: T::Err| {
        VoltLogError::format(index + 1, format!("invalid number `{}`: {}", value, e))
    })
}
