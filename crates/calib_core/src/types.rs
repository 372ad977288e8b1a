//! Type definitions for `calib_core`.
//!
//! Inputs, per-event records and the result bundle of one simulation run.

use serde::{Deserialize, Serialize};

use crate::CalibrationError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The three scalars a calibration plan is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationInput {
    /// [m] Maximum cable length (ρ_max).
    pub max_cable_length: f32,
    /// [m] Vertical height of the support structure.
    pub support_height: f32,
    /// Number of fixed sensor stations.
    pub station_count: u32,
}

impl CalibrationInput {
    pub fn new(max_cable_length: f32, support_height: f32, station_count: u32) -> Self {
        Self {
            max_cable_length,
            support_height,
            station_count,
        }
    }

    /// Check the input bounds. A valid input always yields a complete run.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if !self.max_cable_length.is_finite() || self.max_cable_length <= 0.0 {
            return Err(CalibrationError::InvalidCableLength(self.max_cable_length));
        }
        if !self.support_height.is_finite() || self.support_height <= 0.0 {
            return Err(CalibrationError::InvalidSupportHeight(self.support_height));
        }
        if self.support_height > self.max_cable_length {
            return Err(CalibrationError::SupportExceedsCable {
                support_height: self.support_height,
                max_cable_length: self.max_cable_length,
            });
        }
        if self.station_count < 1 {
            return Err(CalibrationError::NoStations);
        }
        Ok(())
    }

    /// ρ[0]: cable left once the support height has been paid out.
    pub fn initial_residual(&self) -> f32 {
        self.max_cable_length - self.support_height
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Passage of one mark through one station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// [s] Time of passage.
    pub time: f32,
    pub mark_index: u32,
    /// [m] Residual cable length to this mark (ρᵢ).
    pub residual_length: f32,
    pub station_index: u32,
    /// [m] Distance from the previous mark (Δρᵢ).
    pub delta: f32,
}

/// Recommended mounting position of one station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationPosition {
    pub station_index: u32,
    /// [m] Vertical distance from the winch center.
    pub position: f32,
}

/// Outcome of the stopping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "marks", rename_all = "snake_case")]
pub enum MarkRequirement {
    /// The residual length dropped below the reference spacing at this mark.
    Required(u32),
    /// The mark budget ran out first. Re-run with a larger budget.
    NotDetermined,
}

impl MarkRequirement {
    pub fn count(self) -> Option<u32> {
        match self {
            MarkRequirement::Required(marks) => Some(marks),
            MarkRequirement::NotDetermined => None,
        }
    }

    pub fn is_determined(self) -> bool {
        matches!(self, MarkRequirement::Required(_))
    }
}

/// Everything produced by one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationRun {
    pub input: CalibrationInput,
    /// Upper bound on marks the run was allowed to process.
    pub estimated_marks: u32,
    /// Detection events in emission order: mark ascending, station descending.
    pub events: Vec<DetectionEvent>,
    /// ρ[0] through ρ[last processed mark].
    pub cable_trace: Vec<f32>,
    pub required_marks: MarkRequirement,
    /// Station positions, ranks `station_count` down to 1.
    pub stations: Vec<StationPosition>,
}

impl CalibrationRun {
    /// Events emitted for `mark_index`, in station-descending order.
    pub fn events_for_mark(&self, mark_index: u32) -> &[DetectionEvent] {
        let start = self.events.partition_point(|e| e.mark_index < mark_index);
        let end = self.events.partition_point(|e| e.mark_index <= mark_index);
        &self.events[start..end]
    }

    /// ρ[i], if the run reached mark `i`.
    pub fn residual_at(&self, mark_index: u32) -> Option<f32> {
        self.cable_trace.get(mark_index as usize).copied()
    }

    pub fn station_position(&self, station_index: u32) -> Option<f32> {
        self.stations
            .iter()
            .find(|s| s.station_index == station_index)
            .map(|s| s.position)
    }

    /// Number of marks that went past the stations.
    #[allow(clippy::cast_possible_truncation)]
    pub fn marks_processed(&self) -> u32 {
        self.cable_trace.len().saturating_sub(1) as u32
    }

    /// [s] Latest detection time, `None` when no event was emitted.
    pub fn total_duration(&self) -> Option<f32> {
        self.events.iter().map(|e| e.time).reduce(f32::max)
    }
}
