//! Validation errors raised at mission and engine boundaries.

use thiserror::Error;

/// Malformed input rejected before any trajectory is built or any scan begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Mission has no waypoints
    #[error("mission must have at least one waypoint")]
    EmptyWaypoints,

    /// Mission id is blank
    #[error("mission id must not be empty")]
    EmptyId,

    /// Flight window is empty or reversed
    #[error("invalid time window: t_end ({t_end}) must be greater than t_start ({t_start})")]
    InvalidTimeWindow { t_start: f64, t_end: f64 },

    /// NaN or infinite input
    #[error("{0} must be a finite number")]
    NonFiniteValue(&'static str),

    #[error("safety radius must be positive, got {0}")]
    InvalidSafetyRadius(f64),

    #[error("time step must be positive, got {0}")]
    InvalidTimeStep(f64),

    /// Check would exceed the configured sampling budget
    #[error("check would take {requested} samples, limit is {limit}")]
    TooManySamples { requested: usize, limit: usize },
}
