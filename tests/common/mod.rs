//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Resistor voltages with width-2 pulses of `height` at each index in `starts`
pub fn pulse_train(len: usize, starts: &[usize], height: f64) -> Vec<f64> {
    let mut values = vec![0.0; len];
    for &s in starts {
        for v in values.iter_mut().skip(s).take(2) {
            *v = height;
        }
    }
    values
}
