//! Console tables in the layout of the original planning tool.

use calib_core::{CalibrationRun, MarkRequirement, StationPosition};
use std::io::Write;

const EVENT_RULE: &str =
    "--------------------------------------------------------------------------";
const STATION_RULE: &str = "-----------------------------------------------------------";

pub fn print_events(writer: &mut impl Write, run: &CalibrationRun) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Estimated number of marks: {}", run.estimated_marks)?;
    writeln!(writer, "{EVENT_RULE}")?;
    writeln!(
        writer,
        "|  Time [s] | Mark # |  ρᵢ [m]  | Station # | Δρᵢ [m] |"
    )?;
    writeln!(writer, "{EVENT_RULE}")?;
    for event in &run.events {
        writeln!(
            writer,
            "| {:9.2} | {:6} | {:8.2} | {:9} | {:8.2} |",
            event.time, event.mark_index, event.residual_length, event.station_index, event.delta,
        )?;
    }
    writeln!(writer, "{EVENT_RULE}")?;
    match run.required_marks {
        MarkRequirement::Required(marks) => {
            writeln!(writer, "Required number of metallic marks: {marks}")
        }
        MarkRequirement::NotDetermined => writeln!(
            writer,
            "Required number of metallic marks: not determined within {} marks \
             (re-run with a larger --mark-budget)",
            run.estimated_marks
        ),
    }
}

pub fn print_stations(writer: &mut impl Write, stations: &[StationPosition]) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "Recommended vertical positions for sensor stations:"
    )?;
    writeln!(writer, "{STATION_RULE}")?;
    writeln!(
        writer,
        "| Station # | sⱼ (Distance from winch center) [m]          |"
    )?;
    writeln!(writer, "{STATION_RULE}")?;
    for station in stations {
        writeln!(
            writer,
            "| {:9} | {:38.2} |",
            station.station_index, station.position
        )?;
    }
    writeln!(writer, "{STATION_RULE}")
}
