//! JSON scenario files.
//!
//! ```json
//! {
//!   "name": "survey",
//!   "safety_radius": 10.0,
//!   "time_step": 0.5,
//!   "primary": {"id": "P", "waypoints": [{"x": 0, "y": 0, "z": 20}], "t_start": 0, "t_end": 60},
//!   "traffic": []
//! }
//! ```

use anyhow::{Context, Result};
use deconflict_core::{EngineConfig, Mission, MissionRequest};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::scenarios::Scenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub safety_radius: Option<f64>,
    #[serde(default)]
    pub time_step: Option<f64>,
    pub primary: MissionRequest,
    #[serde(default)]
    pub traffic: Vec<MissionRequest>,
}

impl ScenarioFile {
    /// Validate missions and fill unset settings from `defaults`.
    pub fn into_scenario(self, defaults: &EngineConfig) -> Result<Scenario> {
        let primary_id = self.primary.id.clone();
        let primary = Mission::try_from(self.primary)
            .with_context(|| format!("invalid primary mission '{}'", primary_id))?;

        let traffic = self
            .traffic
            .into_iter()
            .enumerate()
            .map(|(i, request)| {
                let id = request.id.clone();
                Mission::try_from(request)
                    .with_context(|| format!("invalid traffic mission #{} '{}'", i + 1, id))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Scenario {
            name: self.name.unwrap_or_else(|| "file".to_string()),
            description: self.description.unwrap_or_default(),
            safety_radius: self.safety_radius.unwrap_or(defaults.safety_radius),
            time_step: self.time_step.unwrap_or(defaults.time_step),
            primary,
            traffic,
        })
    }
}

/// Read and validate a scenario file.
pub fn load_scenario(path: &Path, defaults: &EngineConfig) -> Result<Scenario> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;
    let file: ScenarioFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse scenario file {}", path.display()))?;
    file.into_scenario(defaults)
}
