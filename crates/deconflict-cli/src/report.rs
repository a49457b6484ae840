//! Human-readable scenario output.

use deconflict_core::CheckStatus;
use std::fmt::Write;

use crate::scenarios::ScenarioReport;

fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Clear => "CLEAR",
        CheckStatus::ConflictDetected => "CONFLICT DETECTED",
    }
}

/// Multi-line summary: status, first conflict, closest approach.
pub fn render_text(report: &ScenarioReport) -> String {
    let mut out = String::new();
    let result = &report.result;

    let _ = writeln!(
        out,
        "--- Scenario '{}': {} vs {} traffic (radius {} m, step {} s) ---",
        report.scenario,
        report.primary.id(),
        report.traffic.len(),
        report.safety_radius,
        report.time_step
    );
    let _ = writeln!(out, "Status: {}", status_label(result.status));

    if let Some(first) = result.first_conflict() {
        let [x, y, z] = first.location.to_array();
        let _ = writeln!(
            out,
            "First conflict: t={:.2}s with {} at ({:.2}, {:.2}, {:.2}), distance {:.2} m",
            first.time, first.conflicting_drone_id, x, y, z, first.distance
        );
    }
    if let Some(closest) = result.closest_approach() {
        let _ = writeln!(
            out,
            "Closest approach: {:.2} m with {} at t={:.2}s",
            closest.distance, closest.conflicting_drone_id, closest.time
        );
        let _ = writeln!(
            out,
            "Conflicting missions: {} ({} sample(s))",
            result.conflicting_ids().join(", "),
            result.details.len()
        );
    }

    out
}
