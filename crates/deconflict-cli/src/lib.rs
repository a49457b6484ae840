//! Deconfliction CLI - scenario driver for the conflict engine.
//!
//! Provides the `run_scenario` binary plus the scenarios it runs:
//! - built-in example missions (crossing, altitude-separated, ...)
//! - JSON scenario files

pub mod report;
pub mod scenario_file;
pub mod scenarios;

pub use scenario_file::{load_scenario, ScenarioFile};
pub use scenarios::{builtin, Scenario, ScenarioReport, BUILTIN_SCENARIOS};
