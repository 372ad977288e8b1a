//! Fixed spacing tables for marks and stations.
//!
//! Both tables are cyclic: lookups wrap modulo [`TABLE_LEN`] on the raw index
//! they are given. They are constants of the calibration procedure, not inputs.

/// Number of entries in each spacing table.
pub const TABLE_LEN: usize = 7;

/// [m] Spacing between consecutive metallic marks, indexed by `mark_index % 7`.
pub const MARK_SPACING_M: [f32; TABLE_LEN] = [0.75, 0.15, 0.65, 0.25, 0.55, 0.35, 0.45];

/// [m] Correction applied to each station position, indexed by
/// `(station_count - rank + 1) % 7`.
pub const STATION_SPACING_M: [f32; TABLE_LEN] = [0.8, 0.2, 0.7, 0.3, 0.6, 0.4, 0.5];

/// [m] Average distance between successive marks. Only used to size the run.
pub const AVERAGE_MARK_SPACING_M: f32 = 0.45;

/// [m/s] Cable unspool speed. Event times are cable distances divided by this.
pub const CABLE_SPEED_M_PER_S: f32 = 1.0;

/// Spacing subtracted from the residual length when reaching `mark_index`.
pub fn mark_spacing(mark_index: u32) -> f32 {
    MARK_SPACING_M[mark_index as usize % TABLE_LEN]
}

/// Residual length below which no further mark can be placed.
pub fn reference_spacing() -> f32 {
    MARK_SPACING_M[0]
}

/// Station correction term for a derived station rank (`station_count - j + 1`).
pub fn station_spacing(derived_rank: u32) -> f32 {
    STATION_SPACING_M[derived_rank as usize % TABLE_LEN]
}
