//! Shared test fixtures for calib_core and downstream crates.

use crate::CalibrationInput;

/// Absolute tolerance for comparing single-precision lengths.
pub const EPSILON: f32 = 1e-4;

/// 10 m of cable, 2 m support, two stations.
pub fn reference_input() -> CalibrationInput {
    CalibrationInput::new(10.0, 2.0, 2)
}

/// A spread of valid inputs covering short and long cables and many stations.
pub fn input_grid() -> Vec<CalibrationInput> {
    let mut inputs = Vec::new();
    for &max_cable_length in &[1.0_f32, 3.5, 10.0, 27.0, 120.0] {
        for &support_height in &[0.5_f32, 1.0, 2.0, 3.0] {
            if support_height > max_cable_length {
                continue;
            }
            for station_count in [1, 2, 3, 7, 8, 15] {
                inputs.push(CalibrationInput::new(
                    max_cable_length,
                    support_height,
                    station_count,
                ));
            }
        }
    }
    inputs
}

#[track_caller]
pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}
