//! Rigid 2D transforms and axis-aligned bounding boxes.

use nalgebra::{Isometry2, Point2, Vector2};
use std::f64::consts::FRAC_PI_2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Converts a compass course (0 = north, clockwise, radians) into the
/// counter-clockwise-from-east angle used by [`Transform2D`].
#[inline]
pub fn compass_to_math(course: f64) -> f64 {
    FRAC_PI_2 - course
}

/// A rotation about the origin followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform2D {
    /// Translation along x.
    pub tx: f64,
    /// Translation along y.
    pub ty: f64,
    /// Counter-clockwise rotation in radians.
    pub angle: f64,
}

impl Transform2D {
    /// Creates a transform from a translation and a counter-clockwise angle.
    pub fn new(tx: f64, ty: f64, angle: f64) -> Self {
        Self { tx, ty, angle }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Places a vessel-local frame (+x = bow) at `(x, y)` pointing along a compass course.
    pub fn from_course(x: f64, y: f64, course: f64) -> Self {
        Self::new(x, y, compass_to_math(course))
    }

    fn isometry(&self) -> Isometry2<f64> {
        Isometry2::new(Vector2::new(self.tx, self.ty), self.angle)
    }

    /// Applies the transform to a single point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.isometry() * Point2::new(x, y);
        (p.x, p.y)
    }

    /// Applies the transform to every point of a ring.
    pub fn apply_all(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let iso = self.isometry();
        points
            .iter()
            .map(|&(x, y)| {
                let p = iso * Point2::new(x, y);
                (p.x, p.y)
            })
            .collect()
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AABB2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl AABB2D {
    /// Creates a bounding box from its corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Computes the bounding box of a point set. Returns `None` for an empty set.
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(x0, y0), rest) = points.split_first()?;
        let mut aabb = Self::new(x0, y0, x0, y0);
        for &(x, y) in rest {
            aabb.min_x = aabb.min_x.min(x);
            aabb.min_y = aabb.min_y.min(y);
            aabb.max_x = aabb.max_x.max(x);
            aabb.max_y = aabb.max_y.max(y);
        }
        Some(aabb)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns true if the boxes share any point, boundaries included.
    pub fn intersects(&self, other: &AABB2D) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}
