//! Trajectory construction under a constant-speed assumption.
//!
//! Each waypoint is assigned a timestamp proportional to the distance flown
//! to reach it, so the drone covers its whole route in exactly its window.

use crate::error::ValidationError;
use crate::models::{Trajectory, TrajectoryPoint, Waypoint};

/// Build a time-stamped trajectory for `waypoints` flown over `[t_start, t_end]`.
///
/// A route with zero total length produces a stationary trajectory: all
/// points are stamped `t_start` and [`Trajectory::is_stationary`] is set.
pub fn build_trajectory(
    waypoints: &[Waypoint],
    t_start: f64,
    t_end: f64,
) -> Result<Trajectory, ValidationError> {
    validate_inputs(waypoints, t_start, t_end)?;
    Ok(build_validated(waypoints, t_start, t_end))
}

/// Sum of segment lengths along the route.
pub fn path_length(waypoints: &[Waypoint]) -> f64 {
    segment_lengths(waypoints).iter().sum()
}

pub(crate) fn validate_inputs(
    waypoints: &[Waypoint],
    t_start: f64,
    t_end: f64,
) -> Result<(), ValidationError> {
    if waypoints.is_empty() {
        return Err(ValidationError::EmptyWaypoints);
    }
    if !t_start.is_finite() {
        return Err(ValidationError::NonFiniteValue("t_start"));
    }
    if !t_end.is_finite() {
        return Err(ValidationError::NonFiniteValue("t_end"));
    }
    if waypoints.iter().any(|wp| !wp.is_finite()) {
        return Err(ValidationError::NonFiniteValue("waypoint coordinate"));
    }
    if t_end <= t_start {
        return Err(ValidationError::InvalidTimeWindow { t_start, t_end });
    }
    Ok(())
}

/// Build from inputs already known to satisfy [`validate_inputs`].
pub(crate) fn build_validated(waypoints: &[Waypoint], t_start: f64, t_end: f64) -> Trajectory {
    let lengths = segment_lengths(waypoints);
    let total: f64 = lengths.iter().sum();

    if total == 0.0 {
        let points = waypoints
            .iter()
            .map(|&position| TrajectoryPoint { position, t: t_start })
            .collect();
        return Trajectory::new(points, t_start, t_end, true);
    }

    let duration = t_end - t_start;
    let mut points = Vec::with_capacity(waypoints.len());
    let mut t = t_start;
    points.push(TrajectoryPoint {
        position: waypoints[0],
        t,
    });

    for (segment, &position) in lengths.iter().zip(&waypoints[1..]) {
        t += (segment / total) * duration;
        points.push(TrajectoryPoint { position, t });
    }

    // Pin the arrival time; the running sum drifts in the last bits.
    if let Some(last) = points.last_mut() {
        last.t = t_end;
    }

    Trajectory::new(points, t_start, t_end, false)
}

fn segment_lengths(waypoints: &[Waypoint]) -> Vec<f64> {
    waypoints
        .windows(2)
        .map(|pair| pair[0].distance_to(pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;

    #[test]
    fn test_two_waypoints_span_window_exactly() {
        let wps = [Point3::new(0.0, 50.0, 20.0), Point3::new(100.0, 50.0, 20.0)];
        let trajectory = build_trajectory(&wps, 0.3, 17.9).unwrap();

        let points = trajectory.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].t, 0.3);
        assert_eq!(points[1].t, 17.9);
        assert!(!trajectory.is_stationary());
    }

    #[test]
    fn test_time_is_proportional_to_distance() {
        // Segments of 10, 30 and 60 meters over 100 seconds.
        let wps = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 30.0, 0.0),
            Point3::new(10.0, 30.0, 60.0),
        ];
        let trajectory = build_trajectory(&wps, 0.0, 100.0).unwrap();
        let times: Vec<f64> = trajectory.points().iter().map(|p| p.t).collect();

        assert_eq!(times.len(), 4);
        assert!((times[1] - 10.0).abs() < 1e-9);
        assert!((times[2] - 40.0).abs() < 1e-9);
        assert_eq!(times[3], 100.0);
        assert!((trajectory.average_speed() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_final_timestamp_has_no_drift() {
        let wps: Vec<Point3> = (0..50)
            .map(|i| Point3::new(i as f64 * 0.1, (i as f64 * 0.7).sin(), 3.0))
            .collect();
        let trajectory = build_trajectory(&wps, 1.1, 7.3).unwrap();

        assert_eq!(trajectory.points().first().unwrap().t, 1.1);
        assert_eq!(trajectory.points().last().unwrap().t, 7.3);
        assert!(trajectory.points().windows(2).all(|p| p[0].t <= p[1].t));
    }

    #[test]
    fn test_repeated_waypoint_shares_timestamp() {
        let wps = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(20.0, 0.0, 0.0),
        ];
        let trajectory = build_trajectory(&wps, 0.0, 20.0).unwrap();
        let points = trajectory.points();

        assert_eq!(points[1].t, points[2].t);
        assert!((points[1].t - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_route_is_stationary() {
        let hover = Point3::new(5.0, 5.0, 30.0);
        let trajectory = build_trajectory(&[hover, hover, hover], 2.0, 12.0).unwrap();

        assert!(trajectory.is_stationary());
        assert_eq!(trajectory.len(), 3);
        assert!(trajectory.points().iter().all(|p| p.t == 2.0 && p.position == hover));
        assert_eq!(trajectory.average_speed(), 0.0);

        let single = build_trajectory(&[hover], 2.0, 12.0).unwrap();
        assert!(single.is_stationary());
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_rejects_malformed_inputs() {
        let wp = [Point3::new(0.0, 0.0, 0.0)];
        assert_eq!(
            build_trajectory(&[], 0.0, 1.0).unwrap_err(),
            ValidationError::EmptyWaypoints
        );
        assert!(matches!(
            build_trajectory(&wp, 5.0, 1.0),
            Err(ValidationError::InvalidTimeWindow { .. })
        ));
        assert!(matches!(
            build_trajectory(&wp, 0.0, f64::INFINITY),
            Err(ValidationError::NonFiniteValue(_))
        ));
        assert!(matches!(
            build_trajectory(&[Point3::new(f64::NAN, 0.0, 0.0)], 0.0, 1.0),
            Err(ValidationError::NonFiniteValue(_))
        ));
    }

    #[test]
    fn test_build_is_pure() {
        let wps = [Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0)];
        assert_eq!(
            build_trajectory(&wps, 0.0, 5.0).unwrap(),
            build_trajectory(&wps, 0.0, 5.0).unwrap()
        );
        assert_eq!(path_length(&wps), 5.0);
    }
}
