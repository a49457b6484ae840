//! Scenario file loading tests.

use deconflict_cli::load_scenario;
use deconflict_core::{CheckStatus, EngineConfig};
use std::io::Write;

fn write_scenario(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write scenario");
    file
}

#[test]
fn file_scenario_with_uneven_step_checks_landing_instant() {
    // Primary reaches the parked traffic exactly at t_end; 0.7 s does not
    // divide the 10 s window and the last stepped sample (9.8 s) is still
    // 0.2 m out, so only the explicit final sample sees it.
    let file = write_scenario(
        r#"{
            "name": "landing",
            "safety_radius": 0.1,
            "time_step": 0.7,
            "primary": {
                "id": "Primary",
                "waypoints": [{"x": 0, "y": 0, "z": 0}, {"x": 10, "y": 0, "z": 0}],
                "t_start": 0,
                "t_end": 10
            },
            "traffic": [
                {"id": "Parked", "waypoints": [{"x": 10, "y": 0, "z": 0}], "t_start": 0, "t_end": 30}
            ]
        }"#,
    );

    let scenario = load_scenario(file.path(), &EngineConfig::default()).expect("load");
    assert_eq!(scenario.name, "landing");
    assert_eq!(scenario.time_step, 0.7);

    let report = scenario.run().expect("run");
    assert_eq!(report.result.status, CheckStatus::ConflictDetected);
    assert_eq!(report.result.details.len(), 1);
    assert_eq!(report.result.details[0].time, 10.0);
    assert_eq!(report.result.details[0].distance, 0.0);
}

#[test]
fn report_json_carries_renderer_inputs() {
    let file = write_scenario(
        r#"{
            "primary": {"id": "P", "waypoints": [{"x": 0, "y": 0, "z": 5}, {"x": 0, "y": 40, "z": 5}], "t_start": 0, "t_end": 8},
            "traffic": [
                {"id": "T", "waypoints": [{"x": 100, "y": 0, "z": 5}], "t_start": 0, "t_end": 8}
            ]
        }"#,
    );

    let report = load_scenario(file.path(), &EngineConfig::default())
        .expect("load")
        .run()
        .expect("run");
    let value = serde_json::to_value(&report).expect("serialize");

    assert_eq!(value["result"]["status"], "CLEAR");
    assert_eq!(value["primary"]["trajectory"]["points"][1]["t"], 8.0);
    assert_eq!(value["traffic"][0]["trajectory"]["stationary"], true);
}

#[test]
fn unreadable_or_invalid_files_fail() {
    let missing = std::path::Path::new("/nonexistent/scenario.json");
    assert!(load_scenario(missing, &EngineConfig::default()).is_err());

    let garbage = write_scenario("{ not json");
    assert!(load_scenario(garbage.path(), &EngineConfig::default()).is_err());

    let reversed = write_scenario(
        r#"{"primary": {"id": "P", "waypoints": [{"x": 0, "y": 0, "z": 0}], "t_start": 5, "t_end": 1}}"#,
    );
    let err = load_scenario(reversed.path(), &EngineConfig::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("invalid primary mission 'P'"));
}
