use thiserror::Error;

/// Rejected calibration input. Raised before any event is generated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("maximum cable length must be a finite positive number, got {0}")]
    InvalidCableLength(f32),

    #[error("support height must be a finite positive number, got {0}")]
    InvalidSupportHeight(f32),

    #[error("support height {support_height} m exceeds maximum cable length {max_cable_length} m")]
    SupportExceedsCable {
        support_height: f32,
        max_cable_length: f32,
    },

    #[error("at least one sensor station is required")]
    NoStations,

    #[error("maximum cable length {0} m needs more marks than a u32 mark index can count")]
    EstimateOutOfRange(f32),
}
