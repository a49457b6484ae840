//! Strategic deconfliction for drone missions.
//!
//! Missions are turned into constant-speed trajectories, sampled by
//! interpolation, and scanned against registered traffic for separation
//! violations.

pub mod engine;
pub mod error;
pub mod geometry;
pub mod models;
pub mod sampler;
pub mod trajectory;

pub use engine::{
    position_at, sample_count, sample_times, ConflictEngine, EngineConfig, MAX_SAMPLES_PER_CHECK,
};
pub use error::ValidationError;
pub use geometry::Point3;
pub use models::{
    CheckResult, CheckStatus, ConflictRecord, Mission, MissionRequest, Trajectory,
    TrajectoryPoint, Waypoint,
};
pub use sampler::{sample, Sample, TrajectoryCursor};
pub use trajectory::{build_trajectory, path_length};
