//! Integration tests for period detection, energy accounting and alignment

mod common;

use common::builders::LogBuilder;
use common::{assert_float_eq, pulse_train};
use voltlog_rs::{
    compute_energy, AnalysisConfig, LogParser, PeakAnalyzer, PeakConfig, PeriodStatus, Report,
    TimeAligner, VoltLogError,
};

#[test]
fn test_energy_of_synthetic_recording() {
    let text = LogBuilder::new()
        .resistance(2.0)
        .sampling_rate(10.0)
        .block_pairs(0, &[(1.0, 2.0); 10])
        .build();
    let rec = LogParser::parse_str(&text).unwrap();

    let usage = compute_energy(&rec).unwrap();
    assert_eq!(usage.energy_joules, 1.0);
    assert_eq!(usage.average_power_watts, 1.0);
}

#[test]
fn test_energy_ignores_gaps_between_blocks() {
    // Duration is N * P / rate, not the span of the timepoints
    let text = LogBuilder::new()
        .resistance(1.0)
        .sampling_rate(10.0)
        .applied_voltage(1.0)
        .block(0, &[1.0; 10])
        .block(100, &[1.0; 10])
        .build();
    let rec = LogParser::parse_str(&text).unwrap();

    let usage = compute_energy(&rec).unwrap();
    assert_eq!(usage.duration_seconds, 2.0);
    assert_eq!(usage.energy_joules, 2.0);
    assert_eq!(usage.average_power_watts, 1.0);
}

#[test]
fn test_energy_of_empty_recording_is_arithmetic_error() {
    let text = LogBuilder::new().points_per_sample(5).build();
    let rec = LogParser::parse_str(&text).unwrap();
    assert!(matches!(
        compute_energy(&rec),
        Err(VoltLogError::Arithmetic(_))
    ));
}

#[test]
fn test_trace_below_threshold_has_no_gaps() {
    // A negative constant sits below 40% of its own maximum everywhere
    let text = LogBuilder::new()
        .block(0, &[-0.3; 50])
        .block(1, &[-0.3; 50])
        .build();
    let rec = LogParser::parse_str(&text).unwrap();

    let estimate = PeakAnalyzer::new().detect_period(&rec).unwrap();
    assert_eq!(estimate.status, PeriodStatus::NoPeriodNoGaps);
    assert_eq!(estimate.period, None);
}

#[test]
fn test_positive_constant_trace_yields_equal_gaps() {
    // Every index is above threshold, so a new start closes every 11 indices
    let text = LogBuilder::new().sampling_rate(10.0).block(0, &[0.3; 50]).build();
    let rec = LogParser::parse_str(&text).unwrap();

    let estimate = PeakAnalyzer::new().detect_period(&rec).unwrap();
    assert_eq!(estimate.gap_count, 4);
    assert_eq!(estimate.status, PeriodStatus::NoPeriodNoConsistentGaps);
}

#[test]
fn test_period_of_jittered_pulse_train() {
    // Gaps 2.0, 2.2, 2.0, 4.0 s at 10 Hz; the long gap falls outside the window
    let trace = pulse_train(120, &[0, 20, 42, 62, 102], 0.8);
    let text = LogBuilder::new().sampling_rate(10.0).block(0, &trace).build();
    let rec = LogParser::parse_str(&text).unwrap();

    let estimate = PeakAnalyzer::new().detect_period(&rec).unwrap();
    assert_eq!(estimate.status, PeriodStatus::Ok);
    assert_float_eq(estimate.period.unwrap(), 6.2 / 3.0, 1e-9);
    assert_float_eq(estimate.threshold, 0.32, 1e-12);
}

#[test]
fn test_nan_reading_reports_no_gaps() {
    let mut trace = pulse_train(40, &[0, 12, 25], 1.0);
    trace[39] = f64::NAN;
    let text = LogBuilder::new().sampling_rate(10.0).block(0, &trace).build();
    assert!(text.contains("\nNaN\n"));
    let rec = LogParser::parse_str(&text).unwrap();

    let estimate = PeakAnalyzer::new().detect_period(&rec).unwrap();
    assert_eq!(estimate.gap_count, 0);
    assert_eq!(estimate.status, PeriodStatus::NoPeriodNoGaps);
}

#[test]
fn test_regular_pulse_train_reports_no_consistent_gaps() {
    let trace = pulse_train(100, &[0, 25, 50, 75], 1.0);
    let text = LogBuilder::new().sampling_rate(100.0).block(0, &trace).build();
    let rec = LogParser::parse_str(&text).unwrap();

    let estimate = PeakAnalyzer::new().detect_period(&rec).unwrap();
    assert_eq!(estimate.gap_count, 3);
    assert_eq!(estimate.status, PeriodStatus::NoPeriodNoConsistentGaps);
}

#[test]
fn test_cooldown_is_configurable() {
    // With a cooldown of 30 the 20- and 22-index gaps merge into one
    let trace = pulse_train(120, &[0, 20, 42, 62, 102], 0.8);
    let text = LogBuilder::new().sampling_rate(10.0).block(0, &trace).build();
    let rec = LogParser::parse_str(&text).unwrap();

    let analyzer = PeakAnalyzer::with_config(PeakConfig {
        cooldown: 30,
        ..PeakConfig::default()
    });
    let estimate = analyzer.detect_period(&rec).unwrap();
    assert_eq!(estimate.gap_count, 2);
}

#[test]
fn test_detect_period_is_idempotent() {
    let trace = pulse_train(120, &[0, 20, 42, 62, 102], 0.8);
    let text = LogBuilder::new()
        .sampling_rate(10.0)
        .block(0, &trace)
        .block(12, &trace)
        .build();
    let rec = LogParser::parse_str(&text).unwrap();

    let analyzer = PeakAnalyzer::new();
    let first = analyzer.detect_period(&rec).unwrap();
    let second = analyzer.detect_period(&rec).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_align_patch_timestamps_to_recording() {
    let text = LogBuilder::new()
        .start_of_day(14, 0, 0)
        .block(0, &[0.1])
        .build();
    let rec = LogParser::parse_str(&text).unwrap();

    let local = TimeAligner::new()
        .align_to(&["14:00:10", "14:00:10", "14:00:11"], &rec)
        .unwrap();
    assert_eq!(local.len(), 3);
    assert_float_eq(local[0], 10.0, 1e-9);
    assert_float_eq(local[1], 10.2, 1e-9);
    assert_float_eq(local[2], 11.0, 1e-9);
}

#[test]
fn test_report_end_to_end() {
    let trace = pulse_train(120, &[0, 20, 42, 62, 102], 0.8);
    let text = LogBuilder::new()
        .sampling_rate(10.0)
        .block(0, &trace)
        .event("Stim on", 0)
        .event("Stim off", 11)
        .build();
    let rec = LogParser::parse_str(&text).unwrap();

    let report = Report::build("pulses.txt", &rec, &AnalysisConfig::default()).unwrap();
    let text = report.to_string();

    assert!(text.starts_with("File pulses.txt events\n"));
    assert!(text.contains("Stim on at time 0s\n"));
    assert!(text.contains("Stim off at time 11s\n"));
    assert!(text.contains("Energy Usage: "));
    assert!(text.contains("Average Power: "));
    assert!(text.contains("Period: "));
}
