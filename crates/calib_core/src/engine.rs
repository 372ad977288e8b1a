use tracing::{debug, warn};

use crate::tables::{
    mark_spacing, reference_spacing, station_spacing, AVERAGE_MARK_SPACING_M, CABLE_SPEED_M_PER_S,
};
use crate::{
    CalibrationError, CalibrationInput, CalibrationRun, DetectionEvent, MarkRequirement,
    StationPosition,
};

/// Upper bound on events reserved up front. Longer runs grow the buffer.
const MAX_PREALLOCATED_EVENTS: usize = 1 << 16;

/// Upper bound on marks and stations reserved up front.
const MAX_PREALLOCATED_ENTRIES: usize = 1 << 12;

/// Run the calibration simulation with the mark count estimated from the
/// cable length.
///
/// Lengths are single precision. Above roughly 2.5e6 m subtracting the
/// smallest mark spacing no longer changes the residual length, so such runs
/// exhaust their mark budget without reaching the stop. Practical inputs are
/// cable lengths up to a few thousand metres.
pub fn simulate(input: &CalibrationInput) -> Result<CalibrationRun, CalibrationError> {
    input.validate()?;
    let estimate = estimate_marks(input.max_cable_length)?;
    Ok(run_events(input, estimate))
}

/// Run the calibration simulation with an explicit mark budget in place of
/// the estimate. Used to re-run when the estimate was too small.
///
/// Storage grows with the marks actually processed, not with the budget.
pub fn simulate_with_budget(
    input: &CalibrationInput,
    mark_budget: u32,
) -> Result<CalibrationRun, CalibrationError> {
    input.validate()?;
    Ok(run_events(input, mark_budget))
}

/// `floor(max_cable_length / average_mark_spacing)`.
///
/// Fails when the estimate does not fit a `u32` mark index.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_marks(max_cable_length: f32) -> Result<u32, CalibrationError> {
    let estimate = (max_cable_length / AVERAGE_MARK_SPACING_M).floor();
    if !estimate.is_finite() || estimate < 0.0 || estimate >= u32::MAX as f32 {
        return Err(CalibrationError::EstimateOutOfRange(max_cable_length));
    }
    Ok(estimate as u32)
}

/// [m] Distance of station `rank` from the winch center.
///
/// `rank` must lie in `1..=station_count`, so the divisor is never zero.
pub fn station_position(input: &CalibrationInput, rank: u32) -> f32 {
    let derived_rank = input.station_count - rank + 1;
    input.support_height / derived_rank as f32 - station_spacing(derived_rank)
}

/// Core recurrence, without input validation.
///
/// Order of operations per mark `i` (ascending):
/// 1. For each station `j` from `station_count` down to 1: advance ρ, recompute
///    Δρ and the station position, emit one event.
/// 2. Record ρ[i] and stop once it falls below the reference spacing.
///
/// The recurrence lives inside the station loop, so with no stations no
/// residual length is ever produced and the requirement stays undetermined.
pub(crate) fn run_events(input: &CalibrationInput, mark_budget: u32) -> CalibrationRun {
    let station_count = input.station_count;
    let span = input.max_cable_length + input.support_height;
    let threshold = reference_spacing();

    debug!(
        max_cable_length = input.max_cable_length,
        support_height = input.support_height,
        station_count,
        mark_budget,
        "starting calibration run"
    );

    let mut cable_trace =
        Vec::with_capacity((mark_budget as usize).min(MAX_PREALLOCATED_ENTRIES) + 1);
    cable_trace.push(input.initial_residual());
    let mut events = Vec::with_capacity(
        (mark_budget as usize)
            .saturating_mul(station_count as usize)
            .min(MAX_PREALLOCATED_EVENTS),
    );
    // Slot `station_count - rank`: the first mark pass pushes ranks in visiting
    // order, later passes overwrite in place.
    let mut stations: Vec<StationPosition> =
        Vec::with_capacity((station_count as usize).min(MAX_PREALLOCATED_ENTRIES));
    let mut required_marks = MarkRequirement::NotDetermined;
    let mut previous = input.initial_residual();

    for mark_index in 1..=mark_budget {
        let mut residual = None;

        for rank in (1..=station_count).rev() {
            let current = previous - mark_spacing(mark_index);
            let delta = previous - current;
            let position = station_position(input, rank);
            write_station(&mut stations, station_count, rank, position);
            let time = (span - current - position) / CABLE_SPEED_M_PER_S;

            events.push(DetectionEvent {
                time,
                mark_index,
                residual_length: current,
                station_index: rank,
                delta,
            });
            residual = Some(current);
        }

        let Some(current) = residual else {
            break;
        };
        cable_trace.push(current);
        previous = current;

        if current < threshold {
            debug!(mark_index, residual = current, "cable too short, stopping");
            required_marks = MarkRequirement::Required(mark_index);
            break;
        }
    }

    if !required_marks.is_determined() && station_count > 0 {
        warn!(
            mark_budget,
            residual = previous,
            "mark budget exhausted before the cable ran short"
        );
    }

    // No mark pass ran: fill the table from the closed form.
    #[allow(clippy::cast_possible_truncation)]
    let written = stations.len() as u32;
    for rank in (1..=station_count - written).rev() {
        stations.push(StationPosition {
            station_index: rank,
            position: station_position(input, rank),
        });
    }

    CalibrationRun {
        input: *input,
        estimated_marks: mark_budget,
        events,
        cable_trace,
        required_marks,
        stations,
    }
}

fn write_station(stations: &mut Vec<StationPosition>, station_count: u32, rank: u32, position: f32) {
    let slot = (station_count - rank) as usize;
    if let Some(station) = stations.get_mut(slot) {
        station.position = position;
    } else {
        stations.push(StationPosition {
            station_index: rank,
            position,
        });
    }
}
