//! Cartesian geometry for mission positions.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A position in local Cartesian space (meters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, other: Point3) -> Point3 {
        Point3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(self, other: Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, factor: f64) -> Point3 {
        Point3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Euclidean length when treated as a vector.
    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance_to(self, other: Point3) -> f64 {
        other.sub(self).magnitude()
    }

    /// Linear interpolation; `fraction` 0 yields `self`, 1 yields `other`.
    pub fn lerp(self, other: Point3, fraction: f64) -> Point3 {
        self.add(other.sub(self).scale(fraction))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(v: [f64; 3]) -> Self {
        Point3::new(v[0], v[1], v[2])
    }
}

impl From<(f64, f64, f64)> for Point3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Point3::new(x, y, z)
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::add(self, rhs)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::sub(self, rhs)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;

    fn mul(self, rhs: f64) -> Point3 {
        self.scale(rhs)
    }
}

/// Round to two decimal places, as reported in conflict records.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serde adapter encoding a [`Point3`] as `[x, y, z]`.
pub mod as_array {
    use super::Point3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(point: &Point3, serializer: S) -> Result<S::Ok, S::Error> {
        point.to_array().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Point3, D::Error> {
        <[f64; 3]>::deserialize(deserializer).map(Point3::from)
    }
}
