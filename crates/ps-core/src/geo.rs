//! Planar world coordinates.
//!
//! The simulated area is a flat rectangle measured in metres, so positions
//! are plain Cartesian `(x, y)` pairs.  `f32` gives millimetre precision over
//! a few kilometres, which is more than a walkway map needs.

use std::ops::{Add, Mul, Sub};

/// A point (or displacement) in real-world units.
#[derive(Copy, Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to `other`.
    #[inline]
    pub fn distance(self, other: Point2) -> f32 {
        (other - self).length()
    }

    /// Euclidean norm when the point is read as a vector.
    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or the zero vector for (0, 0).
    pub fn normalized(self) -> Point2 {
        let len = self.length();
        if len <= f32::EPSILON {
            Point2::ORIGIN
        } else {
            Point2::new(self.x / len, self.y / len)
        }
    }
}

impl Add for Point2 {
    type Output = Point2;
    #[inline]
    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;
    #[inline]
    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point2 {
    type Output = Point2;
    #[inline]
    fn mul(self, rhs: f32) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::fmt::Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
