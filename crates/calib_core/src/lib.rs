//! `calib_core` — deterministic event simulation for CDPR auto-calibration.
//!
//! Given a cable length, a support height and a station count, computes the
//! detection events of metallic marks passing fixed sensor stations, the
//! number of marks required and the recommended station positions.
//! No IO beyond the report writers, which take any `std::io::Write`.

mod engine;
mod error;
pub mod report;
pub mod tables;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use engine::{estimate_marks, simulate, simulate_with_budget, station_position};
pub use error::CalibrationError;
pub use report::{summarize, RunSummary, REPORT_VERSION};
pub use types::*;
