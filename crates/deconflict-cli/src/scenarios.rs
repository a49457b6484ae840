//! Pre-defined deconfliction scenarios.

use deconflict_core::{
    CheckResult, ConflictEngine, EngineConfig, Mission, Point3, ValidationError,
};
use serde::Serialize;

/// A primary mission, the traffic it must avoid, and the check settings.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub safety_radius: f64,
    pub time_step: f64,
    pub primary: Mission,
    pub traffic: Vec<Mission>,
}

/// Everything a renderer needs to draw a checked scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub safety_radius: f64,
    pub time_step: f64,
    pub primary: Mission,
    pub traffic: Vec<Mission>,
    pub result: CheckResult,
}

impl Scenario {
    /// Register the traffic with a fresh engine and check the primary.
    pub fn run(&self) -> Result<ScenarioReport, ValidationError> {
        let mut engine = ConflictEngine::new(EngineConfig {
            safety_radius: self.safety_radius,
            time_step: self.time_step,
        })?;
        for mission in &self.traffic {
            engine.register_traffic(mission.clone());
        }

        let result = engine.check_mission(&self.primary, self.time_step)?;
        tracing::debug!(
            "Scenario {} finished with {} conflict sample(s)",
            self.name,
            result.details.len()
        );

        Ok(ScenarioReport {
            scenario: self.name.clone(),
            safety_radius: self.safety_radius,
            time_step: self.time_step,
            primary: self.primary.clone().with_trajectory(),
            traffic: engine.traffic().to_vec(),
            result,
        })
    }
}

/// Names accepted by [`builtin`].
pub const BUILTIN_SCENARIOS: [&str; 4] = ["collision", "clear", "staggered", "stationary"];

/// Look up a built-in scenario by name.
pub fn builtin(name: &str, safety_radius: f64, time_step: f64) -> Option<Result<Scenario, ValidationError>> {
    match name {
        "collision" => Some(create_collision_scenario(safety_radius, time_step)),
        "clear" => Some(create_altitude_separated_scenario(safety_radius, time_step)),
        "staggered" => Some(create_staggered_scenario(safety_radius, time_step)),
        "stationary" => Some(create_hover_scenario(safety_radius, time_step)),
        _ => None,
    }
}

fn route(points: &[(f64, f64, f64)]) -> Vec<Point3> {
    points.iter().copied().map(Point3::from).collect()
}

/// Two drones crossing at (50, 50, 20) around t = 10.
///
/// - Traffic: North to South
/// - Primary: West to East
pub fn create_collision_scenario(safety_radius: f64, time_step: f64) -> Result<Scenario, ValidationError> {
    let traffic = Mission::new(
        "Traffic_01",
        route(&[(50.0, 100.0, 20.0), (50.0, 0.0, 20.0)]),
        0.0,
        20.0,
    )?;
    let primary = Mission::new(
        "Primary_Alpha",
        route(&[(0.0, 50.0, 20.0), (100.0, 50.0, 20.0)]),
        0.0,
        20.0,
    )?;

    Ok(Scenario {
        name: "collision".to_string(),
        description: "Intersecting paths at the same altitude".to_string(),
        safety_radius,
        time_step,
        primary,
        traffic: vec![traffic],
    })
}

/// Same ground tracks as the collision scenario, 40 m apart vertically.
pub fn create_altitude_separated_scenario(
    safety_radius: f64,
    time_step: f64,
) -> Result<Scenario, ValidationError> {
    let traffic = Mission::new(
        "Traffic_02",
        route(&[(50.0, 100.0, 50.0), (50.0, 0.0, 50.0)]),
        0.0,
        20.0,
    )?;
    let primary = Mission::new(
        "Primary_Beta",
        route(&[(0.0, 50.0, 10.0), (100.0, 50.0, 10.0)]),
        0.0,
        20.0,
    )?;

    Ok(Scenario {
        name: "clear".to_string(),
        description: "Crossing ground tracks at different altitudes".to_string(),
        safety_radius,
        time_step,
        primary,
        traffic: vec![traffic],
    })
}

/// Crossing paths at one altitude, but the traffic launches after the
/// primary has landed.
pub fn create_staggered_scenario(safety_radius: f64, time_step: f64) -> Result<Scenario, ValidationError> {
    let traffic = Mission::new(
        "Traffic_03",
        route(&[(50.0, 100.0, 20.0), (50.0, 0.0, 20.0)]),
        25.0,
        45.0,
    )?;
    let primary = Mission::new(
        "Primary_Gamma",
        route(&[(0.0, 50.0, 20.0), (100.0, 50.0, 20.0)]),
        0.0,
        20.0,
    )?;

    Ok(Scenario {
        name: "staggered".to_string(),
        description: "Crossing paths in disjoint time windows".to_string(),
        safety_radius,
        time_step,
        primary,
        traffic: vec![traffic],
    })
}

/// Traffic hovering over the crossing point between t = 5 and t = 15,
/// plus a second drone transiting well clear of the route.
pub fn create_hover_scenario(safety_radius: f64, time_step: f64) -> Result<Scenario, ValidationError> {
    let hover = Mission::new("Hover_01", route(&[(50.0, 50.0, 20.0)]), 5.0, 15.0)?;
    let transit = Mission::new(
        "Transit_01",
        route(&[(0.0, 200.0, 20.0), (100.0, 200.0, 20.0), (100.0, 300.0, 20.0)]),
        0.0,
        30.0,
    )?;
    let primary = Mission::new(
        "Primary_Delta",
        route(&[(0.0, 50.0, 20.0), (100.0, 50.0, 20.0)]),
        0.0,
        20.0,
    )?;

    Ok(Scenario {
        name: "stationary".to_string(),
        description: "Primary passes a hovering drone".to_string(),
        safety_radius,
        time_step,
        primary,
        traffic: vec![hover, transit],
    })
}
