//! Core data models for mission deconfliction.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geometry::{self, Point3};
use crate::trajectory;

/// A planned route point, without a timestamp.
pub type Waypoint = Point3;

/// Time-stamped trajectory point. Only produced by the trajectory builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    #[serde(flatten)]
    pub position: Point3,
    pub t: f64,
}

/// Time-stamped realization of a mission's waypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
    t_start: f64,
    t_end: f64,
    /// Total path length is zero; every point sits at `t_start` and the
    /// mission hovers in place for its whole window.
    stationary: bool,
}

impl Trajectory {
    pub(crate) fn new(points: Vec<TrajectoryPoint>, t_start: f64, t_end: f64, stationary: bool) -> Self {
        Self {
            points,
            t_start,
            t_end,
            stationary,
        }
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn t_start(&self) -> f64 {
        self.t_start
    }

    pub fn t_end(&self) -> f64 {
        self.t_end
    }

    pub fn is_stationary(&self) -> bool {
        self.stationary
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `t` falls inside the flight window (inclusive).
    pub fn covers(&self, t: f64) -> bool {
        self.t_start <= t && t <= self.t_end
    }

    /// Total distance flown along the waypoints.
    pub fn path_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].position.distance_to(pair[1].position))
            .sum()
    }

    /// Constant ground speed implied by the window; zero when stationary.
    pub fn average_speed(&self) -> f64 {
        if self.stationary {
            return 0.0;
        }
        self.path_length() / (self.t_end - self.t_start)
    }
}

/// Wire form of a mission, validated into a [`Mission`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionRequest {
    pub id: String,
    pub waypoints: Vec<Waypoint>,
    pub t_start: f64,
    pub t_end: f64,
}

/// A drone mission: route plus flight window.
///
/// Construction validates the mission, so every `Mission` value has at least
/// one waypoint and `t_end > t_start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MissionRequest")]
pub struct Mission {
    id: String,
    waypoints: Vec<Waypoint>,
    t_start: f64,
    t_end: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    trajectory: Option<Trajectory>,
}

impl Mission {
    /// Create a validated mission with no trajectory built yet.
    pub fn new(
        id: impl Into<String>,
        waypoints: Vec<Waypoint>,
        t_start: f64,
        t_end: f64,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        trajectory::validate_inputs(&waypoints, t_start, t_end)?;

        Ok(Self {
            id,
            waypoints,
            t_start,
            t_end,
            trajectory: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn t_start(&self) -> f64 {
        self.t_start
    }

    pub fn t_end(&self) -> f64 {
        self.t_end
    }

    /// Whether the mission is scheduled to be in the air at `t`.
    pub fn covers(&self, t: f64) -> bool {
        self.t_start <= t && t <= self.t_end
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    pub fn is_built(&self) -> bool {
        self.trajectory.is_some()
    }

    /// Build the trajectory, replacing any previously built one.
    pub fn build_trajectory(&mut self) -> &Trajectory {
        let built = trajectory::build_validated(&self.waypoints, self.t_start, self.t_end);
        self.trajectory.insert(built)
    }

    /// Build the trajectory only if it is missing.
    pub fn ensure_trajectory(&mut self) -> &Trajectory {
        let (waypoints, t_start, t_end) = (&self.waypoints, self.t_start, self.t_end);
        self.trajectory
            .get_or_insert_with(|| trajectory::build_validated(waypoints, t_start, t_end))
    }

    /// Consume the mission and return it with a freshly built trajectory.
    pub fn with_trajectory(mut self) -> Self {
        self.build_trajectory();
        self
    }
}

impl TryFrom<MissionRequest> for Mission {
    type Error = ValidationError;

    fn try_from(request: MissionRequest) -> Result<Self, Self::Error> {
        Mission::new(request.id, request.waypoints, request.t_start, request.t_end)
    }
}

/// Overall outcome of a mission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Clear,
    ConflictDetected,
}

/// A sampled instant where the primary came too close to a traffic mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// Sample time, rounded to two decimals
    pub time: f64,
    /// Primary mission's position at the sample
    #[serde(with = "geometry::as_array")]
    pub location: Point3,
    pub conflicting_drone_id: String,
    /// Separation at the sample, rounded to two decimals
    pub distance: f64,
}

/// Result of checking a primary mission against registered traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub details: Vec<ConflictRecord>,
}

impl CheckResult {
    pub fn from_details(details: Vec<ConflictRecord>) -> Self {
        let status = if details.is_empty() {
            CheckStatus::Clear
        } else {
            CheckStatus::ConflictDetected
        };
        Self { status, details }
    }

    pub fn is_clear(&self) -> bool {
        self.status == CheckStatus::Clear
    }

    pub fn first_conflict(&self) -> Option<&ConflictRecord> {
        self.details.first()
    }

    /// Distinct conflicting mission ids in first-seen order.
    pub fn conflicting_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for record in &self.details {
            if !ids.contains(&record.conflicting_drone_id.as_str()) {
                ids.push(&record.conflicting_drone_id);
            }
        }
        ids
    }

    /// Record with the smallest separation; earliest wins on ties.
    pub fn closest_approach(&self) -> Option<&ConflictRecord> {
        self.details.iter().fold(None, |best: Option<&ConflictRecord>, record| match best {
            Some(current) if current.distance <= record.distance => Some(current),
            _ => Some(record),
        })
    }
}
