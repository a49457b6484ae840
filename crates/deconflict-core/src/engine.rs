//! Strategic conflict engine.
//!
//! Checks a primary mission against registered traffic by sampling every
//! mission at a fixed time step across the primary's flight window.
//!
//! The scan is a fixed-interval approximation of continuous motion: a
//! conflict that begins and ends strictly between two samples is not
//! reported. The worst-case miss is about relative speed × `time_step` / 2,
//! so pick the step (or pad the safety radius) with that in mind.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geometry::round2;
use crate::models::{CheckResult, ConflictRecord, Mission, MissionRequest};
use crate::sampler::{self, Sample, TrajectoryCursor};
use crate::trajectory;

/// Fraction of a step within which a stepped sample counts as landing on `t_end`.
const END_TOLERANCE: f64 = 1e-9;

/// Hard cap on the sampling grid of a single check.
pub const MAX_SAMPLES_PER_CHECK: usize = 10_000_000;

/// Largest grid [`sample_times`] preallocates for up front.
const PREALLOCATE_LIMIT: usize = 1 << 16;

/// Configuration for the conflict engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum allowed separation between two airborne missions (meters)
    pub safety_radius: f64,
    /// Default sampling interval for checks (seconds)
    pub time_step: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            safety_radius: 5.0,
            time_step: 0.5,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.safety_radius.is_finite() && self.safety_radius > 0.0) {
            return Err(ValidationError::InvalidSafetyRadius(self.safety_radius));
        }
        validate_time_step(self.time_step)
    }
}

/// Holds the traffic registry and runs checks against it.
#[derive(Debug, Clone)]
pub struct ConflictEngine {
    config: EngineConfig,
    /// Registered traffic in registration order, trajectories built
    registry: Vec<Mission>,
}

impl ConflictEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            config,
            registry: Vec::new(),
        })
    }

    /// Engine with the given radius and the default time step.
    pub fn with_safety_radius(safety_radius: f64) -> Result<Self, ValidationError> {
        Self::new(EngineConfig {
            safety_radius,
            ..EngineConfig::default()
        })
    }

    pub fn safety_radius(&self) -> f64 {
        self.config.safety_radius
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn traffic(&self) -> &[Mission] {
        &self.registry
    }

    pub fn traffic_count(&self) -> usize {
        self.registry.len()
    }

    /// Register a traffic mission, building its trajectory if needed.
    ///
    /// Infallible: a `Mission` is validated when it is constructed.
    pub fn register_traffic(&mut self, mut mission: Mission) {
        let (points, stationary) = {
            let trajectory = mission.ensure_trajectory();
            (trajectory.len(), trajectory.is_stationary())
        };
        tracing::debug!(
            mission_id = mission.id(),
            points,
            stationary,
            position = self.registry.len(),
            "Registered traffic"
        );
        self.registry.push(mission);
    }

    /// Validate a wire-form mission and register it.
    pub fn register_request(&mut self, request: MissionRequest) -> Result<&Mission, ValidationError> {
        let mission = Mission::try_from(request)?;
        self.register_traffic(mission);
        Ok(&self.registry[self.registry.len() - 1])
    }

    /// Check with the configured default time step.
    pub fn check_mission_default(&self, primary: &Mission) -> Result<CheckResult, ValidationError> {
        self.check_mission(primary, self.config.time_step)
    }

    /// Check `primary` against all registered traffic.
    ///
    /// Details are ordered by sample time, then by registration order.
    /// The primary's trajectory is built privately; neither the caller's
    /// mission nor the registry is modified.
    pub fn check_mission(
        &self,
        primary: &Mission,
        time_step: f64,
    ) -> Result<CheckResult, ValidationError> {
        validate_time_step(time_step)?;
        let requested = sample_count(primary.t_start(), primary.t_end(), time_step);
        if requested > MAX_SAMPLES_PER_CHECK {
            return Err(ValidationError::TooManySamples {
                requested,
                limit: MAX_SAMPLES_PER_CHECK,
            });
        }

        let trajectory =
            trajectory::build_validated(primary.waypoints(), primary.t_start(), primary.t_end());
        let times = sample_times(primary.t_start(), primary.t_end(), time_step);

        let mut primary_cursor = TrajectoryCursor::new(&trajectory);
        let mut traffic_cursors: Vec<Option<TrajectoryCursor<'_>>> = self
            .registry
            .iter()
            .map(|other| other.trajectory().map(TrajectoryCursor::new))
            .collect();

        let mut details = Vec::new();
        for &t in &times {
            let Sample::Airborne(position) = primary_cursor.sample(t) else {
                continue;
            };

            for (other, cursor) in self.registry.iter().zip(traffic_cursors.iter_mut()) {
                if !other.covers(t) {
                    continue;
                }
                let Some(cursor) = cursor else {
                    continue;
                };
                let Sample::Airborne(other_position) = cursor.sample(t) else {
                    continue;
                };

                let distance = position.distance_to(other_position);
                if distance < self.config.safety_radius {
                    details.push(ConflictRecord {
                        time: round2(t),
                        location: position,
                        conflicting_drone_id: other.id().to_string(),
                        distance: round2(distance),
                    });
                }
            }
        }

        let result = CheckResult::from_details(details);
        tracing::info!(
            mission_id = primary.id(),
            samples = times.len(),
            traffic = self.registry.len(),
            conflicts = result.details.len(),
            "Mission check complete: {:?}",
            result.status
        );
        Ok(result)
    }
}

/// Sample times covering `[t_start, t_end]` at `time_step` spacing.
///
/// Times are `t_start + i * time_step` while below `t_end`, followed by
/// `t_end` itself, so the landing instant is always checked exactly once.
/// The end cutoff is measured in steps, not seconds, so large absolute
/// times (epoch seconds) keep every stepped sample.
/// A non-positive step or an empty window yields only the window endpoints.
///
/// The grid is not capped; callers bound it with [`sample_count`] first.
pub fn sample_times(t_start: f64, t_end: f64, time_step: f64) -> Vec<f64> {
    if t_end <= t_start {
        return vec![t_start];
    }
    if !(time_step.is_finite() && time_step > 0.0) {
        return vec![t_start, t_end];
    }
    let steps = (t_end - t_start) / time_step - END_TOLERANCE;
    let mut times =
        Vec::with_capacity(sample_count(t_start, t_end, time_step).min(PREALLOCATE_LIMIT));
    times.push(t_start);
    let mut i: u64 = 1;
    while (i as f64) < steps {
        let t = t_start + i as f64 * time_step;
        if t >= t_end {
            break;
        }
        // Steps finer than the float spacing at `t` collapse onto one time.
        if times.last().map_or(true, |&last| t > last) {
            times.push(t);
        }
        i += 1;
    }
    times.push(t_end);
    times
}

/// Upper bound on the number of samples [`sample_times`] produces.
///
/// Saturates at `usize::MAX` for steps too small to count.
pub fn sample_count(t_start: f64, t_end: f64, time_step: f64) -> usize {
    if t_end <= t_start {
        return 1;
    }
    if !(time_step.is_finite() && time_step > 0.0) {
        return 2;
    }
    let steps = ((t_end - t_start) / time_step).ceil();
    if !steps.is_finite() || steps >= usize::MAX as f64 {
        return usize::MAX;
    }
    (steps as usize).saturating_add(1)
}

fn validate_time_step(time_step: f64) -> Result<(), ValidationError> {
    if time_step.is_finite() && time_step > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimeStep(time_step))
    }
}

/// Position of `mission` at `t`, building a private trajectory if needed.
pub fn position_at(mission: &Mission, t: f64) -> Sample {
    match mission.trajectory() {
        Some(trajectory) => sampler::sample(trajectory, t),
        None => {
            let built = mission.clone().with_trajectory();
            built
                .trajectory()
                .map_or(Sample::NotAirborne, |trajectory| sampler::sample(trajectory, t))
        }
    }
}
