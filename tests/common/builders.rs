//! Test data builders for creating log text

use std::fmt::Write as _;

/// Builder for instrument log text
pub struct LogBuilder {
    start_of_day: Option<(u32, u32, u32)>,
    sampling_rate: f64,
    resistance: f64,
    applied_voltage: f64,
    points_per_sample: Option<usize>,
    blocks: Vec<(u64, Vec<String>)>,
    events: Vec<(String, u64)>,
    omitted: Vec<&'static str>,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self {
            start_of_day: None,
            sampling_rate: 1000.0,
            resistance: 10.0,
            applied_voltage: 5.0,
            points_per_sample: None,
            blocks: Vec::new(),
            events: Vec::new(),
            omitted: Vec::new(),
        }
    }

    pub fn start_of_day(mut self, hour: u32, minute: u32, second: u32) -> Self {
        self.start_of_day = Some((hour, minute, second));
        self
    }

    pub fn sampling_rate(mut self, rate: f64) -> Self {
        self.sampling_rate = rate;
        self
    }

    pub fn resistance(mut self, resistance: f64) -> Self {
        self.resistance = resistance;
        self
    }

    pub fn applied_voltage(mut self, voltage: f64) -> Self {
        self.applied_voltage = voltage;
        self
    }

    /// Override the declared points per sample
    pub fn points_per_sample(mut self, points: usize) -> Self {
        self.points_per_sample = Some(points);
        self
    }

    /// Add a block with resistor voltages only
    pub fn block(mut self, start: u64, resistor: &[f64]) -> Self {
        let lines = resistor.iter().map(|v| format!("{}", v)).collect();
        self.blocks.push((start, lines));
        self
    }

    /// Add a block with resistor and power-source voltages
    pub fn block_pairs(mut self, start: u64, pairs: &[(f64, f64)]) -> Self {
        let lines = pairs
            .iter()
            .map(|(rv, pv)| format!("{}, {}", rv, pv))
            .collect();
        self.blocks.push((start, lines));
        self
    }

    pub fn event(mut self, name: &str, time: u64) -> Self {
        self.events.push((name.to_string(), time));
        self
    }

    /// Leave out the scalar line with this key
    pub fn omit(mut self, key: &'static str) -> Self {
        self.omitted.push(key);
        self
    }

    pub fn build(self) -> String {
        let mut out = String::new();

        if let Some((h, m, s)) = self.start_of_day {
            writeln!(out, "Start Hour: {}", h).unwrap();
            writeln!(out, "Start Minute: {}", m).unwrap();
            writeln!(out, "Start Second: {}", s).unwrap();
        }

        let points = self
            .points_per_sample
            .unwrap_or_else(|| self.blocks.first().map(|(_, l)| l.len()).unwrap_or(0));
        let scalars = [
            ("Number of Samples", self.blocks.len().to_string()),
            ("Timepoints per Sample", points.to_string()),
            ("Sampling Rate", self.sampling_rate.to_string()),
            ("Resistance", self.resistance.to_string()),
            ("Applied Voltage", self.applied_voltage.to_string()),
        ];
        for (key, value) in scalars {
            if !self.omitted.contains(&key) {
                writeln!(out, "{}: {}", key, value).unwrap();
            }
        }

        for (index, (start, lines)) in self.blocks.iter().enumerate() {
            writeln!(out, "Sample {}: {}", index + 1, start).unwrap();
            for line in lines {
                writeln!(out, "{}", line).unwrap();
            }
        }

        for (name, time) in &self.events {
            writeln!(out, "{}: {}", name, time).unwrap();
        }

        out
    }
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
