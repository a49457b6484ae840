//! Position sampling along a built trajectory.

use crate::geometry::Point3;
use crate::models::{Trajectory, TrajectoryPoint};

/// Outcome of sampling a trajectory at a given time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Airborne(Point3),
    /// Query time is before launch or after landing
    NotAirborne,
}

impl Sample {
    pub fn position(self) -> Option<Point3> {
        match self {
            Sample::Airborne(position) => Some(position),
            Sample::NotAirborne => None,
        }
    }

    pub fn is_airborne(self) -> bool {
        matches!(self, Sample::Airborne(_))
    }
}

/// Interpolated position at time `t`.
///
/// Scans segments from the start; use [`TrajectoryCursor`] for many
/// queries in increasing time order.
pub fn sample(trajectory: &Trajectory, t: f64) -> Sample {
    let mut index = 0;
    sample_from(trajectory, t, &mut index)
}

/// Remembers the last bracketing segment between queries.
///
/// Produces the same positions as [`sample`]; monotonically increasing
/// queries resume from the previous segment instead of rescanning.
#[derive(Debug, Clone)]
pub struct TrajectoryCursor<'a> {
    trajectory: &'a Trajectory,
    index: usize,
    last_t: f64,
}

impl<'a> TrajectoryCursor<'a> {
    pub fn new(trajectory: &'a Trajectory) -> Self {
        Self {
            trajectory,
            index: 0,
            last_t: f64::NEG_INFINITY,
        }
    }

    pub fn sample(&mut self, t: f64) -> Sample {
        if t < self.last_t {
            self.index = 0;
        }
        self.last_t = t;
        sample_from(self.trajectory, t, &mut self.index)
    }
}

fn sample_from(trajectory: &Trajectory, t: f64, index: &mut usize) -> Sample {
    if !trajectory.covers(t) {
        return Sample::NotAirborne;
    }

    let points = trajectory.points();
    let Some(first) = points.first() else {
        return Sample::NotAirborne;
    };

    if trajectory.is_stationary() || points.len() == 1 {
        return Sample::Airborne(first.position);
    }

    // First segment whose end is not before t; ties stay on the earlier segment.
    let last_segment = points.len() - 2;
    if *index > last_segment {
        *index = 0;
    }
    while *index < last_segment && points[*index + 1].t < t {
        *index += 1;
    }

    Sample::Airborne(interpolate(&points[*index], &points[*index + 1], t))
}

fn interpolate(from: &TrajectoryPoint, to: &TrajectoryPoint, t: f64) -> Point3 {
    let span = to.t - from.t;
    if span == 0.0 {
        return from.position;
    }
    let fraction = (t - from.t) / span;
    from.position.lerp(to.position, fraction)
}
