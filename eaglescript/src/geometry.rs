//! Point and vector utilities
//!
//! Plain 2D helpers used by signals and signal groups. All angles are in
//! radians, measured counter-clockwise from the +X axis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::signal::Vertex;

/// A 2D coordinate in millimeters.
///
/// Anything that names a location (a `(x, y)` pair, an `[x, y]` array or a
/// signal vertex) converts into a `Point`, so the free functions below accept
/// `impl Into<Point>`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Cartesian offset of length `r` along heading `theta`.
    pub fn polar(r: f64, theta: f64) -> Self {
        Self {
            x: r * theta.cos(),
            y: r * theta.sin(),
        }
    }

    /// Length of the vector from the origin to this point.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<&Vertex> for Point {
    fn from(v: &Vertex) -> Self {
        v.point()
    }
}

impl From<Vertex> for Point {
    fn from(v: Vertex) -> Self {
        v.point()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Euclidean distance between two points.
pub fn distance(p1: impl Into<Point>, p2: impl Into<Point>) -> f64 {
    let (a, b) = (p1.into(), p2.into());
    (b - a).magnitude()
}

/// Signed component of the vector `p1 -> p2` along heading `theta`.
///
/// Positive when `p2` lies ahead of `p1` in the `theta` direction. The
/// complementary component is orthogonal to `theta`.
pub fn distance_theta(p1: impl Into<Point>, p2: impl Into<Point>, theta: f64) -> f64 {
    let (a, b) = (p1.into(), p2.into());
    let delta = b - a;
    let angle = delta.y.atan2(delta.x);
    delta.magnitude() * (theta - angle).cos()
}

/// Express the vector `(x, y)`, given in a frame rotated by `theta_i`, in a
/// frame rotated by `theta_f`.
///
/// This is a pure rotation by `theta_i - theta_f`; the magnitude of the
/// vector is preserved.
pub fn project(x: f64, y: f64, theta_f: f64, theta_i: f64) -> (f64, f64) {
    let d_theta = theta_i - theta_f;
    let (sin, cos) = d_theta.sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            ((0.0, 0.0), (3.0, 4.0)),
            ((-1.5, 2.0), (7.25, -3.0)),
            ((10.0, 10.0), (10.0, 10.0)),
        ];
        for (a, b) in pairs {
            assert!((distance(a, b) - distance(b, a)).abs() < EPS);
        }
        assert!((distance((0.0, 0.0), (3.0, 4.0)) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_distance_accepts_vertices() {
        let v = Vertex::new(3.0, 4.0);
        assert!((distance(&v, [0.0, 0.0]) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_distance_theta_of_coincident_points_is_zero() {
        for theta in [0.0, 0.3, FRAC_PI_2, PI, -2.0] {
            assert_eq!(distance_theta((1.0, 2.0), (1.0, 2.0), theta), 0.0);
        }
    }

    #[test]
    fn test_distance_theta_sign() {
        // p2 ahead along +X
        assert!((distance_theta((0.0, 0.0), (2.0, 5.0), 0.0) - 2.0).abs() < EPS);
        // p2 behind along +Y
        assert!((distance_theta((0.0, 0.0), (2.0, -5.0), FRAC_PI_2) + 5.0).abs() < EPS);
        // diagonal
        let d = distance_theta((0.0, 0.0), (1.0, 1.0), FRAC_PI_4);
        assert!((d - 2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_project_preserves_magnitude() {
        let angles = [0.0, 0.1, FRAC_PI_4, FRAC_PI_2, PI, -1.3, 5.0];
        for &theta_f in &angles {
            for &theta_i in &angles {
                let (x, y) = project(3.0, -4.0, theta_f, theta_i);
                assert!((x.hypot(y) - 5.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_project_rotates_by_angle_difference() {
        // +X in a frame rotated by pi/2 is +Y in the base frame
        let (x, y) = project(1.0, 0.0, 0.0, FRAC_PI_2);
        assert!(x.abs() < EPS);
        assert!((y - 1.0).abs() < EPS);

        let (x, y) = project(2.0, 1.0, 0.7, 0.7);
        assert!((x - 2.0).abs() < EPS && (y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_point_display_and_serde() {
        assert_eq!(Point::new(1.0, 2.5).to_string(), "(1 2.5)");
        let p: Point = serde_json::from_str("[3.0, -4.0]").unwrap();
        assert_eq!(p, Point::new(3.0, -4.0));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[3.0,-4.0]");
    }
}
