use calib_core::tables::reference_spacing;
use calib_core::test_fixtures::{assert_close, reference_input};
use calib_core::{simulate, CalibrationInput, MarkRequirement};

#[test]
fn reference_run_seeds_from_support_height() {
    let run = simulate(&reference_input()).unwrap();
    assert_close(run.cable_trace[0], 8.0);
    assert_eq!(run.estimated_marks, 22);
}

#[test]
fn reference_run_first_mark() {
    let run = simulate(&reference_input()).unwrap();
    let first = run.events_for_mark(1);
    assert_eq!(first.len(), 2);

    assert_eq!(first[0].station_index, 2);
    assert_close(first[0].residual_length, 7.85);
    assert_close(first[0].delta, 0.15);
    assert_close(first[0].time, 12.0 - 7.85 - 1.8);

    assert_eq!(first[1].station_index, 1);
    assert_close(first[1].time, 12.0 - 7.85 - 0.3);
}

#[test]
fn reference_run_station_positions() {
    let run = simulate(&reference_input()).unwrap();
    assert_close(run.station_position(2).unwrap(), 1.8);
    assert_close(run.station_position(1).unwrap(), 0.3);
    assert_eq!(run.station_position(3), None);
}

#[test]
fn reference_run_requires_seventeen_marks() {
    let run = simulate(&reference_input()).unwrap();
    assert_eq!(run.required_marks, MarkRequirement::Required(17));
    assert_eq!(run.required_marks.count(), Some(17));
    assert_eq!(run.events.len(), 34);
    assert_close(run.residual_at(16).unwrap(), 0.90);
    assert_close(run.residual_at(17).unwrap(), 0.65);
    assert_eq!(run.residual_at(18), None);
    assert!(run.events_for_mark(18).is_empty());
}

#[test]
fn reference_run_duration_is_last_nearest_station() {
    let run = simulate(&reference_input()).unwrap();
    // Latest event: mark 17 at station 1.
    assert_close(run.total_duration().unwrap(), 12.0 - 0.65 - 0.3);
}

#[test]
fn many_stations_follow_the_cyclic_table() {
    let input = CalibrationInput::new(30.0, 9.0, 9);
    let run = simulate(&input).unwrap();
    // Derived rank for station 1 is 9, table entry 2 (0.7).
    assert_close(run.station_position(1).unwrap(), 1.0 - 0.7);
    // Derived rank for station 9 is 1, table entry 1 (0.2).
    assert_close(run.station_position(9).unwrap(), 9.0 - 0.2);
    assert!(run.required_marks.is_determined());
}

#[test]
fn run_round_trips_through_json() {
    let run = simulate(&reference_input()).unwrap();
    let json = serde_json::to_string(&run).unwrap();
    let back: calib_core::CalibrationRun = serde_json::from_str(&json).unwrap();
    assert_eq!(back.events, run.events);
    assert_eq!(back.required_marks, run.required_marks);
    assert_eq!(back.stations, run.stations);
}

#[test]
fn long_cable_with_many_stations_is_not_truncated() {
    // Past 1000 marks and 100 stations.
    let input = CalibrationInput::new(500.0, 2.0, 120);
    let run = simulate(&input).unwrap();
    assert_eq!(run.estimated_marks, 1111);

    let MarkRequirement::Required(marks) = run.required_marks else {
        panic!("500 m cable should reach the stop");
    };
    assert!(marks > 1000, "required {marks}");
    assert_eq!(marks, 1106);
    assert_eq!(run.marks_processed(), marks);
    assert_eq!(run.events.len(), marks as usize * 120);
    assert_eq!(run.stations.len(), 120);

    let threshold = reference_spacing();
    assert!(run.residual_at(marks).unwrap() < threshold);
    assert!(run.residual_at(marks - 1).unwrap() >= threshold);

    let last = run.events_for_mark(marks);
    assert_eq!(last.len(), 120);
    assert_eq!(last[0].station_index, 120);
    assert_eq!(last[119].station_index, 1);
}
